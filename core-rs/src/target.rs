//! What an install or uninstall command acts on

/// Kernels selected by a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KernelTarget {
    /// Explicit kernel names
    Names(Vec<String>),
    /// The settings-configured template kernel
    Template,
    /// Every registry kernel (install) or every installed directory (uninstall)
    All,
}

impl KernelTarget {
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        KernelTarget::Names(names.into_iter().map(Into::into).collect())
    }

    pub fn is_template(&self) -> bool {
        matches!(self, KernelTarget::Template)
    }
}
