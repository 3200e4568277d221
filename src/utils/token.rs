// src/utils/token.rs

//! Share-token codec: `ExamPayload` -> JSON -> gzip -> URL-safe base64, and back.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use flate2::read::GzDecoder;
use flate2::{Compression, GzBuilder};

use crate::{config::MAX_DECODED_TOKEN_BYTES, error::TokenError, models::exam::ExamPayload};

/// Encodes an exam into a URL-safe token.
///
/// The gzip header carries the creation time as its mtime.
pub fn encode_exam(exam: &ExamPayload) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(exam)?;

    let mtime = u32::try_from(exam.created_at.timestamp()).unwrap_or(0);
    let mut encoder = GzBuilder::new()
        .mtime(mtime)
        .write(Vec::with_capacity(json.len() / 2), Compression::best());
    // Writing into a Vec cannot fail.
    encoder.write_all(&json).map_err(serde_json::Error::io)?;
    let compressed = encoder.finish().map_err(serde_json::Error::io)?;

    Ok(URL_SAFE_NO_PAD.encode(compressed))
}

/// Decodes a token produced by [`encode_exam`].
///
/// Accepts the standard base64 alphabet and trailing padding as well, since
/// tokens get mangled when pasted around. An exam with no questions is rejected.
pub fn decode_exam(token: Option<&str>) -> Result<ExamPayload, TokenError> {
    let token = token.map(str::trim).filter(|t| !t.is_empty());
    let Some(token) = token else {
        return Err(TokenError::Missing);
    };

    let normalized: String = token
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    let compressed = URL_SAFE_NO_PAD
        .decode(normalized.as_bytes())
        .map_err(|e| TokenError::Decode(format!("base64: {}", e)))?;

    let mut json = Vec::new();
    GzDecoder::new(compressed.as_slice())
        .take(MAX_DECODED_TOKEN_BYTES + 1)
        .read_to_end(&mut json)
        .map_err(|e| TokenError::Decode(format!("gzip: {}", e)))?;

    if json.len() as u64 > MAX_DECODED_TOKEN_BYTES {
        return Err(TokenError::PayloadInvalid("payload too large".to_string()));
    }

    let exam: ExamPayload = serde_json::from_slice(&json)
        .map_err(|e| TokenError::PayloadInvalid(format!("json: {}", e)))?;

    if exam.questions.is_empty() {
        return Err(TokenError::PayloadInvalid("exam has no questions".to_string()));
    }

    Ok(exam)
}
