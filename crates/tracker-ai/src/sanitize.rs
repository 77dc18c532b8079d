//! 전송 전 문자열 정리.

/// 7비트 출력 가능 문자만 남깁니다.
///
/// ASCII 그래픽 문자, 공백, `\t \n \r \x0b \x0c`를 유지하고 나머지(이모지,
/// 비ASCII, 제어 문자)는 제거합니다.
pub fn sanitize(text: &str) -> String {
    text.chars().filter(|c| is_printable(*c)).collect()
}

fn is_printable(c: char) -> bool {
    c.is_ascii_graphic() || matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0b' | '\x0c')
}
