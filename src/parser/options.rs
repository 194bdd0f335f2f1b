//! Parsing options and configuration.

use serde::Serialize;

use crate::model::{CARRIAGE_CONTROL, IDENTIFIER_SIZE, LENGTH_SIZE, MODCA_CLASS};

/// Options for parsing AFP streams.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Record framing of the input
    pub framing: Framing,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record framing.
    pub fn with_framing(mut self, framing: Framing) -> Self {
        self.framing = framing;
        self
    }

    /// Expect bare records (no carriage-control byte).
    pub fn bare(mut self) -> Self {
        self.framing = Framing::Bare;
        self
    }

    /// Expect every record to start with `0x5A`.
    pub fn carriage_control(mut self) -> Self {
        self.framing = Framing::CarriageControl;
        self
    }
}

/// How records are laid out in the stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Framing {
    /// Pick `CarriageControl` or `Bare` from the first record
    #[default]
    Auto,
    /// `length:u16be identifier:[u8; 3] payload`
    Bare,
    /// `0x5A length:u16be identifier:[u8; 3] payload`
    CarriageControl,
}

impl Framing {
    /// Resolve `Auto` against the start of `data`. Other framings are returned
    /// unchanged.
    pub fn resolve(self, data: &[u8]) -> Framing {
        match self {
            Framing::Auto => {
                if data.len() > 3 && data[0] == CARRIAGE_CONTROL && data[3] == MODCA_CLASS {
                    Framing::CarriageControl
                } else {
                    Framing::Bare
                }
            }
            other => other,
        }
    }

    /// Bytes before the length prefix. `Auto` counts as bare.
    pub fn introducer_size(self) -> usize {
        match self {
            Framing::CarriageControl => 1,
            Framing::Auto | Framing::Bare => 0,
        }
    }

    /// Bytes before the payload.
    pub fn header_size(self) -> usize {
        self.introducer_size() + LENGTH_SIZE + IDENTIFIER_SIZE
    }
}

impl std::fmt::Display for Framing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Framing::Auto => "auto",
            Framing::Bare => "bare",
            Framing::CarriageControl => "carriage control (0x5A)",
        };
        f.write_str(name)
    }
}
