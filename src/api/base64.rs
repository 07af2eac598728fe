//! Base64 image payloads, plain or as data URLs

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{AppError, Result};

/// Decode a base64 string or `data:` URL to bytes
pub fn decode(encoded: &str) -> Result<Vec<u8>> {
    // Handle data URL format (e.g., "data:image/png;base64,...")
    let data = match encoded.split_once(',') {
        Some((header, body)) if header.starts_with("data:") => {
            if let Some(media_type) = media_type(encoded) {
                if !media_type.starts_with("image/") {
                    return Err(AppError::InvalidInput(format!(
                        "Expected an image data URL, got {}",
                        media_type
                    )));
                }
            }
            body
        }
        _ => encoded,
    };

    // Clients often wrap long payloads
    let compact: String = data.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    STANDARD
        .decode(compact)
        .map_err(|e| AppError::InvalidInput(format!("Invalid base64 data: {}", e)))
}

/// Media type of a data URL, e.g. `image/png`
pub fn media_type(data_url: &str) -> Option<&str> {
    let rest = data_url.strip_prefix("data:")?;
    let end = rest.find(|c: char| c == ';' || c == ',')?;
    Some(&rest[..end]).filter(|m| !m.is_empty())
}
