use base64::Engine as _;
use protocol::models::IconPayloadDto;

pub const ICON_KIND_PNG_BASE64: &str = "png-base64";

/// Icon handle as produced by the platform fetch. Icons come only from the
/// platform; the manifest never contributes one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconPayload {
    pub kind: String,
    pub value: String,
}

impl IconPayload {
    pub fn to_dto(&self) -> IconPayloadDto {
        IconPayloadDto {
            kind: self.kind.clone(),
            value: self.value.clone(),
        }
    }
}

pub fn encode_package_icon(bytes: &[u8]) -> IconPayload {
    IconPayload {
        kind: ICON_KIND_PNG_BASE64.to_string(),
        value: base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}
