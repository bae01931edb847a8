//! Ticket text to embeddable QR image, as a base64 data URI.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use qrcode::render::svg;
use qrcode::QrCode;

use crate::utils::error::AppError;

const MIN_DIMENSION: u32 = 240;

pub const DATA_URI_PREFIX: &str = "data:image/svg+xml;base64,";

pub fn to_data_uri(text: &str) -> Result<String, AppError> {
    let code = QrCode::new(text.as_bytes())
        .map_err(|e| AppError::Internal(format!("QR encoding failed: {e}")))?;

    let image = code
        .render()
        .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
        .dark_color(svg::Color("#000000"))
        .light_color(svg::Color("#ffffff"))
        .build();

    Ok(format!("{DATA_URI_PREFIX}{}", STANDARD.encode(image.as_bytes())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_uri_is_nonempty_and_prefixed() {
        let uri = to_data_uri("ticket payload").unwrap();
        assert!(uri.starts_with(DATA_URI_PREFIX));
        assert!(uri.len() > DATA_URI_PREFIX.len());
    }

    #[test]
    fn test_encoded_payload_is_valid_base64_svg() {
        let uri = to_data_uri("another payload").unwrap();
        let encoded = &uri[DATA_URI_PREFIX.len()..];
        let decoded = STANDARD.decode(encoded).unwrap();
        let svg = String::from_utf8(decoded).unwrap();
        assert!(svg.contains("<svg"));
    }

    #[test]
    fn test_full_ticket_text_fits_in_a_qr_code() {
        // Roughly the size of a rendered ticket summary
        let text = "x".repeat(600);
        assert!(to_data_uri(&text).is_ok());
    }
}
