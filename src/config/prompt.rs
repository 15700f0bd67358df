use serde_json::{ json, Value };
use std::fs;
use std::path::Path;
use log::info;
use thiserror::Error;

use crate::models::chat::Role;

pub const AXIOM_SYSTEM_PROMPT: &str = "\
Nombre del Agente: Axiom
Rol: Especialista Senior en Resolución de Problemas y Estrategia Lógica.

Objetivo Principal: Ayudar al usuario a identificar la raíz de cualquier problema y proponer soluciones estructuradas, eficientes y técnicamente viables.

Directrices de Comportamiento:
1. Análisis antes de la Respuesta: Antes de dar una solución, desglosa el problema internamente para asegurar que cubres todos los ángulos.
2. Claridad y Precisión: Evita el lenguaje ambiguo. Sé directo, profesional y utiliza un tono de colaboración experta.
3. Estructura: Utiliza listas, pasos o viñetas para que la información sea fácil de digerir.
4. Pensamiento Crítico: Si el usuario plantea una premisa errónea, corrígela amablemente explicando el porqué lógico.
5. Accionabilidad: Cada respuesta debe concluir con un paso sugerido o una solución clara, no solo teoría.

Restricciones:
- No divagues en saludos excesivamente largos.
- Prioriza la utilidad sobre la cortesía exagerada.
- Si un problema es demasiado complejo, solicita los datos faltantes antes de intentar adivinar.
";

#[derive(Debug, Error)]
pub enum PromptError {
    #[error("Failed to read system prompt file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("System prompt file '{0}' is empty")]
    Empty(String),
}

/// The instruction placed in front of every conversation, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemPrompt {
    Fixed(String),
    Disabled,
}

impl Default for SystemPrompt {
    fn default() -> Self {
        SystemPrompt::Fixed(AXIOM_SYSTEM_PROMPT.to_string())
    }
}

impl SystemPrompt {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, PromptError> {
        let display = path.as_ref().display().to_string();
        let content = fs::read_to_string(&path).map_err(|source| PromptError::Io {
            path: display.clone(),
            source,
        })?;
        if content.trim().is_empty() {
            return Err(PromptError::Empty(display));
        }
        info!("Loaded system prompt from '{}' ({} bytes)", display, content.len());
        Ok(SystemPrompt::Fixed(content))
    }

    /// Resolves the prompt from startup options: disabling wins over a file,
    /// and a file wins over the built-in Axiom instruction.
    pub fn load(path: Option<&str>, disabled: bool) -> Result<Self, PromptError> {
        if disabled {
            return Ok(SystemPrompt::Disabled);
        }
        match path.filter(|p| !p.trim().is_empty()) {
            Some(p) => Self::from_file(p),
            None => Ok(SystemPrompt::default()),
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            SystemPrompt::Fixed(text) => Some(text.as_str()),
            SystemPrompt::Disabled => None,
        }
    }

    /// Builds the upstream message list. Caller messages are forwarded as-is.
    pub fn apply(&self, messages: Vec<Value>) -> Vec<Value> {
        let Some(text) = self.text() else {
            return messages;
        };
        let mut out = Vec::with_capacity(messages.len() + 1);
        out.push(json!({ "role": Role::System, "content": text }));
        out.extend(messages);
        out
    }
}
