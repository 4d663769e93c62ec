//! Configuración del motor.
//! Carga variables de entorno (.env) una sola vez y expone una estructura
//! inmutable (`CONFIG`) consultada por el executor.

use std::env;

use once_cell::sync::Lazy;

/// Activa el log por step (`trace`) del executor.
pub const TRACE_STEPS_VAR: &str = "BOXED_TRACE_STEPS";

// Carga perezosa del archivo .env una sola vez.
static DOTENV_LOADED: Lazy<()> = Lazy::new(|| {
    let _ = dotenvy::dotenv(); // ignora error si no existe .env
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PipeConfig {
    /// Emitir un registro `trace` por cada step ejecutado.
    pub trace_steps: bool,
}

impl PipeConfig {
    pub fn from_env() -> Self {
        Lazy::force(&DOTENV_LOADED);
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Construye la configuración a partir de una función de búsqueda
    /// arbitraria (útil en tests para no tocar el entorno del proceso).
    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let trace_steps = lookup(TRACE_STEPS_VAR).map(|v| parse_flag(&v)).unwrap_or(false);
        Self { trace_steps }
    }
}

/// Instancia global perezosa de configuración, evaluada una sola vez.
pub static CONFIG: Lazy<PipeConfig> = Lazy::new(PipeConfig::from_env);

pub fn current() -> &'static PipeConfig {
    &CONFIG
}

/// Forzar carga temprana de .env desde aplicaciones externas si se desea.
pub fn init_dotenv() {
    Lazy::force(&DOTENV_LOADED);
}

fn parse_flag(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
