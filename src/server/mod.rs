pub mod api;

use crate::agent::RelayAgent;
use crate::cli::Args;
use self::api::TlsPaths;
use std::error::Error;
use std::net::SocketAddr;
use std::sync::Arc;
use log::{ error, info };

pub struct Server {
    addr: String,
    agent: Arc<RelayAgent>,
    args: Args,
}

impl Server {
    pub fn new(addr: String, agent: Arc<RelayAgent>, args: Args) -> Self {
        Self { addr, agent, args }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.addr
            .parse::<SocketAddr>()
            .map_err(|e| format!("Invalid server address '{}': {}", self.addr, e))?;

        let tls = self.tls_paths()?;
        if tls.is_none() {
            info!("TLS not enabled. Running plain HTTP server.");
        }

        api::start_http_server(addr, self.agent.clone(), tls).await
    }

    fn tls_paths(&self) -> Result<Option<TlsPaths>, Box<dyn Error + Send + Sync>> {
        if !self.args.enable_tls {
            return Ok(None);
        }
        match (&self.args.tls_cert_path, &self.args.tls_key_path) {
            (Some(cert_path), Some(key_path)) => Ok(Some(TlsPaths {
                cert_path: cert_path.clone(),
                key_path: key_path.clone(),
            })),
            (Some(_), None) | (None, Some(_)) => {
                error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                Err("Missing TLS certificate or key path".into())
            }
            (None, None) => {
                error!("--enable-tls was set but no certificate/key paths provided.");
                Err("TLS enabled without cert/key".into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::prompt::SystemPrompt;
    use crate::llm::LlmConfig;
    use clap::Parser;

    fn server(flags: &[&str]) -> Server {
        let mut argv = vec!["axiom-chat"];
        argv.extend_from_slice(flags);
        let args = Args::try_parse_from(argv).unwrap();
        let config = LlmConfig::new("sk-test", None, None);
        let agent = Arc::new(RelayAgent::from_config(&config, SystemPrompt::default()).unwrap());
        Server::new(args.server_addr.clone(), agent, args)
    }

    #[test]
    fn tls_is_off_unless_enabled() {
        let server = server(&["--tls-cert-path", "cert.pem"]);
        assert!(server.tls_paths().unwrap().is_none());
    }

    #[test]
    fn tls_requires_both_paths() {
        assert!(server(&["--enable-tls", "--tls-cert-path", "cert.pem"]).tls_paths().is_err());
        assert!(server(&["--enable-tls"]).tls_paths().is_err());

        let paths = server(&["--enable-tls", "--tls-cert-path", "c.pem", "--tls-key-path", "k.pem"])
            .tls_paths()
            .unwrap()
            .unwrap();
        assert_eq!(paths.cert_path, "c.pem");
        assert_eq!(paths.key_path, "k.pem");
    }
}
