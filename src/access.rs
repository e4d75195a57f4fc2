//! Secret masking for non-privileged viewers

/// Number of leading characters shown to non-privileged viewers
pub const VISIBLE_PREFIX: usize = 8;

/// Character replacing every hidden character of a secret
pub const MASK_CHAR: char = '*';

pub trait AccessControl: Send + Sync {
    fn is_privileged(&self) -> bool;

    /// Reveals `value` in full to privileged viewers; otherwise keeps the first
    /// [`VISIBLE_PREFIX`] characters and masks the rest
    fn mask_secret(&self, value: &str) -> String {
        if self.is_privileged() {
            return value.to_string();
        }
        value
            .chars()
            .enumerate()
            .map(|(i, c)| if i < VISIBLE_PREFIX { c } else { MASK_CHAR })
            .collect()
    }
}

/// A viewer whose privilege is fixed when it is constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Viewer {
    privileged: bool,
}

impl Viewer {
    pub fn new(privileged: bool) -> Self {
        Self { privileged }
    }

    pub fn privileged() -> Self {
        Self::new(true)
    }

    pub fn regular() -> Self {
        Self::new(false)
    }
}

impl AccessControl for Viewer {
    fn is_privileged(&self) -> bool {
        self.privileged
    }
}
