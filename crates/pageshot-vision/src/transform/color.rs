//! 16진수 색상 파싱.

use image::Rgba;
use pageshot_core::error::CoreError;

pub const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// `#RGB`, `#RRGGBB`, `#RRGGBBAA` (앞의 `#`는 생략 가능)
pub fn parse_hex_color(text: &str) -> Result<Rgba<u8>, CoreError> {
    let hex = text.trim().trim_start_matches('#');
    let invalid = || CoreError::Validation {
        field: "color".to_string(),
        message: format!("잘못된 색상 값: {text}"),
    };

    if !hex.is_ascii() {
        return Err(invalid());
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

    match hex.len() {
        3 => {
            let short = |i: usize| {
                u8::from_str_radix(&hex[i..i + 1], 16)
                    .map(|v| v * 17)
                    .map_err(|_| invalid())
            };
            Ok(Rgba([short(0)?, short(1)?, short(2)?, 255]))
        }
        6 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, 255])),
        8 => Ok(Rgba([channel(0)?, channel(2)?, channel(4)?, channel(6)?])),
        _ => Err(invalid()),
    }
}
