//! Tri-outcome operation envelope
//!
//! Detection outcomes are codes, not errors: `Ghost` and `InvalidObject`
//! are expected, frequent results the scan consumes to pick a code path.
//! The envelope carries a subsystem tag so other subsystems can mint
//! their own code tables without colliding with this one.

use serde::{Deserialize, Serialize};

/// Tag identifying which subsystem minted a result code
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Subsystem(pub u16);

impl Subsystem {
    /// The detection core's own code table
    pub const DETECTION: Subsystem = Subsystem(1);
}

/// Codes owned by the detection subsystem
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum DetectionCode {
    /// The object may be detected normally
    Permitted = 0,
    /// The object is geometrically visible but flagged non-detectable
    Ghost = 1,
    /// The object failed basic validity (inactive or stale)
    InvalidObject = 2,
}

impl DetectionCode {
    /// Decode a raw code from this subsystem's table
    pub fn from_code(code: u16) -> Option<DetectionCode> {
        match code {
            0 => Some(DetectionCode::Permitted),
            1 => Some(DetectionCode::Ghost),
            2 => Some(DetectionCode::InvalidObject),
            _ => None,
        }
    }
}

/// Outcome of an operation: a subsystem tag, a code, and a success bit.
///
/// Coerces to `bool` as true only for the success variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OperationResult {
    subsystem: Subsystem,
    code: u16,
    success: bool,
}

impl OperationResult {
    /// A successful outcome under the given subsystem
    pub fn success(subsystem: Subsystem, code: u16) -> Self {
        Self {
            subsystem,
            code,
            success: true,
        }
    }

    /// A failure outcome under the given subsystem
    pub fn failure(subsystem: Subsystem, code: u16) -> Self {
        Self {
            subsystem,
            code,
            success: false,
        }
    }

    /// The detection core's success outcome
    pub fn permitted() -> Self {
        Self::success(Subsystem::DETECTION, DetectionCode::Permitted as u16)
    }

    /// Visible but non-detectable
    pub fn ghost() -> Self {
        Self::failure(Subsystem::DETECTION, DetectionCode::Ghost as u16)
    }

    /// Failed basic validity
    pub fn invalid_object() -> Self {
        Self::failure(Subsystem::DETECTION, DetectionCode::InvalidObject as u16)
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn subsystem(&self) -> Subsystem {
        self.subsystem
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    /// Decode the code, if this result belongs to the detection subsystem
    pub fn detection_code(&self) -> Option<DetectionCode> {
        if self.subsystem == Subsystem::DETECTION {
            DetectionCode::from_code(self.code)
        } else {
            None
        }
    }
}

impl From<OperationResult> for bool {
    fn from(result: OperationResult) -> bool {
        result.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_success_variant_is_truthy() {
        assert!(bool::from(OperationResult::permitted()));
        assert!(!bool::from(OperationResult::ghost()));
        assert!(!bool::from(OperationResult::invalid_object()));
    }

    #[test]
    fn detection_codes_round_trip() {
        assert_eq!(
            OperationResult::ghost().detection_code(),
            Some(DetectionCode::Ghost)
        );
        assert_eq!(
            OperationResult::invalid_object().detection_code(),
            Some(DetectionCode::InvalidObject)
        );
        assert_eq!(DetectionCode::from_code(99), None);
    }

    #[test]
    fn foreign_subsystems_share_the_envelope() {
        let nav = Subsystem(7);
        let result = OperationResult::failure(nav, 3);
        assert_eq!(result.subsystem(), nav);
        assert_eq!(result.code(), 3);
        assert_eq!(result.detection_code(), None);
    }
}
