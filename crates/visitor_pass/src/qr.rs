//! QR rendering of the visitor pass.

use std::fmt::Write as _;

use qrcodegen::{DataTooLong, QrCode, QrCodeEcc};

use crate::error::QrError;

/// Light modules around the symbol required by scanners.
pub const QUIET_ZONE: i32 = 4;

impl From<DataTooLong> for QrError {
    fn from(_: DataTooLong) -> Self {
        QrError::DataTooLong
    }
}

/// An encoded pass.
#[derive(Clone)]
pub struct QrPass {
    code: QrCode,
}

impl std::fmt::Debug for QrPass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QrPass").field("size", &self.size()).finish()
    }
}

impl QrPass {
    pub fn encode(payload: &str) -> Result<Self, QrError> {
        if payload.is_empty() {
            return Err(QrError::EmptyPayload);
        }
        let code = QrCode::encode_text(payload, QrCodeEcc::Medium)?;
        Ok(Self { code })
    }

    /// Modules per side, without quiet zone.
    pub fn size(&self) -> i32 {
        self.code.size()
    }

    /// Dark module at (x, y). Out-of-range coordinates are light.
    pub fn module(&self, x: i32, y: i32) -> bool {
        self.code.get_module(x, y)
    }

    /// Half-block rendering, two module rows per text line, quiet zone
    /// included. Meant to be drawn light-on-dark: a space is a dark module.
    pub fn to_terminal_lines(&self) -> Vec<String> {
        let lo = -QUIET_ZONE;
        let hi = self.size() + QUIET_ZONE;
        (lo..hi)
            .step_by(2)
            .map(|y| {
                (lo..hi)
                    .map(|x| match (self.module(x, y), self.module(x, y + 1)) {
                        (false, false) => '█',
                        (false, true) => '▀',
                        (true, false) => '▄',
                        (true, true) => ' ',
                    })
                    .collect()
            })
            .collect()
    }

    /// Square SVG image `size_px` wide, quiet zone included.
    pub fn to_svg(&self, size_px: u32) -> String {
        let dim = self.size() + QUIET_ZONE * 2;
        let mut path = String::new();
        for y in 0..self.size() {
            for x in 0..self.size() {
                if self.module(x, y) {
                    let _ = write!(path, "M{},{}h1v1h-1z ", x + QUIET_ZONE, y + QUIET_ZONE);
                }
            }
        }
        format!(
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "\n",
                r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1" width="{px}" height="{px}" viewBox="0 0 {dim} {dim}" stroke="none">"#,
                "\n",
                r##"<rect width="100%" height="100%" fill="#FFFFFF"/>"##,
                "\n",
                r##"<path d="{path}" fill="#000000"/>"##,
                "\n</svg>\n"
            ),
            px = size_px,
            dim = dim,
            path = path.trim_end(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_full_name() {
        let pass = QrPass::encode("Juan Santos Dela Cruz").unwrap();
        // version 2 at medium ecc holds this payload
        assert!(pass.size() >= 21);
        // finder pattern corner is dark
        assert!(pass.module(0, 0));
        assert!(!pass.module(-1, -1));
    }

    #[test]
    fn empty_payload_is_an_error() {
        assert_eq!(QrPass::encode("").unwrap_err(), QrError::EmptyPayload);
    }

    #[test]
    fn oversized_payload_is_an_error() {
        let huge = "A".repeat(5000);
        assert_eq!(QrPass::encode(&huge).unwrap_err(), QrError::DataTooLong);
    }

    #[test]
    fn terminal_lines_cover_code_and_quiet_zone() {
        let pass = QrPass::encode("Ana Cruz").unwrap();
        let side = (pass.size() + 2 * QUIET_ZONE) as usize;
        let lines = pass.to_terminal_lines();

        assert_eq!(lines.len(), side.div_ceil(2));
        assert!(lines.iter().all(|l| l.chars().count() == side));
        // top quiet zone rows are fully light
        assert!(lines[0].chars().all(|c| c == '█'));
    }

    #[test]
    fn svg_has_requested_size() {
        let svg = QrPass::encode("Ana Cruz").unwrap().to_svg(250);
        assert!(svg.contains(r#"width="250" height="250""#));
        assert!(svg.trim_end().ends_with("</svg>"));
    }
}
