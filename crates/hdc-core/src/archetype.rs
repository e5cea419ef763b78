//! Workflow archetypes
//!
//! An archetype is one of the four supported workflow shapes. It decides
//! which facts the session must collect and which step chain the compiler
//! emits.

/// One of the four supported workflow shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    /// Call an API and return the raw response
    RawApiCall,
    /// Call an API and transform the response
    ApiCallWithTransform,
    /// Transform JSON to differently shaped JSON, no API involved
    JsonToJson,
    /// Transform an HL7 message to JSON
    Hl7ToJson,
}

impl Archetype {
    /// Resolve an archetype from the 1-based menu option shown to the user
    pub fn from_option(option: u8) -> Option<Self> {
        match option {
            1 => Some(Archetype::RawApiCall),
            2 => Some(Archetype::ApiCallWithTransform),
            3 => Some(Archetype::JsonToJson),
            4 => Some(Archetype::Hl7ToJson),
            _ => None,
        }
    }

    /// Human-readable label, as presented in the archetype menu
    pub fn label(&self) -> &'static str {
        match self {
            Archetype::RawApiCall => "Call API and return raw response",
            Archetype::ApiCallWithTransform => "Call API and transform the response",
            Archetype::JsonToJson => "Transform JSON to different formatted JSON",
            Archetype::Hl7ToJson => "Transform HL7 to JSON",
        }
    }

    /// HTTP-call archetypes need Connection and Application handling
    /// before workflow facts may be collected
    pub fn needs_connection(&self) -> bool {
        matches!(self, Archetype::RawApiCall | Archetype::ApiCallWithTransform)
    }

    /// Whether this archetype produces an API configuration document
    pub fn needs_api(&self) -> bool {
        self.needs_connection()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_option() {
        assert_eq!(Archetype::from_option(1), Some(Archetype::RawApiCall));
        assert_eq!(Archetype::from_option(4), Some(Archetype::Hl7ToJson));
        assert_eq!(Archetype::from_option(0), None);
        assert_eq!(Archetype::from_option(5), None);
    }

    #[test]
    fn test_connection_requirement() {
        assert!(Archetype::RawApiCall.needs_connection());
        assert!(Archetype::ApiCallWithTransform.needs_connection());
        assert!(!Archetype::JsonToJson.needs_connection());
        assert!(!Archetype::Hl7ToJson.needs_connection());
    }
}
