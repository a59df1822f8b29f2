/// Knobs shared by the compiler driver and the reference VM.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    /// Log the disassembled chunk after lowering.
    pub debug: bool,
    /// Log every instruction the VM executes along with the operand stack.
    pub trace: bool,
}

impl Options {
    /// Reads `PPL_DEBUG` and `PPL_TRACE` from the environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let flag = |key: &str| lookup(key).map(|v| is_enabled(&v)).unwrap_or_default();

        Self {
            debug: flag("PPL_DEBUG"),
            trace: flag("PPL_TRACE"),
        }
    }

    pub fn with_debug(self) -> Self {
        Self { debug: true, ..self }
    }

    pub fn with_trace(self) -> Self {
        Self { trace: true, ..self }
    }
}

fn is_enabled(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
