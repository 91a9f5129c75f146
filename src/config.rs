#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Json,
    Table,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub output_mode: OutputMode,
    pub verbose: bool,
    /// Bridge address from the global flag (or HUEC_BRIDGE), if given.
    pub bridge: Option<String>,
    /// API username from the global flag (or HUEC_USER), if given.
    pub user: Option<String>,
}
