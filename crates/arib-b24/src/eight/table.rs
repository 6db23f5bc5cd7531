//! 符号集合ごとの文字の辞書。

use once_cell::sync::Lazy;

use super::char::GraphicCode;
use super::symbol;
use crate::token::CharSize;

/// JIS X 0208に相当する1区から84区までの漢字の表。
static KANJI: Lazy<Box<[[Option<char>; 94]; 84]>> = Lazy::new(|| {
    crate::utils::boxed_array(|row| {
        let mut cells = [None; 94];
        for (cell, c) in cells.iter_mut().enumerate() {
            let bytes = [0xA1 + row as u8, 0xA1 + cell as u8];
            let decoded = encoding_rs::EUC_JP.decode_without_bom_handling_and_without_replacement(&bytes);
            *c = decoded.and_then(|s| {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            });
        }
        cells
    })
});

/// 漢字集合の文字を得る。
///
/// 85区以降は追加漢字・追加記号として扱い、追加記号は`use_pua`に従いPUAの文字とするかを決める。
pub fn kanji(c1: GraphicCode, c2: GraphicCode, use_pua: bool) -> Option<char> {
    match c1.index() {
        row @ 0..=83 => KANJI[row][c2.index()],
        _ => extra_symbol(c1, c2, use_pua),
    }
}

/// 追加記号集合（追加漢字を含む）の文字を得る。
pub fn extra_symbol(c1: GraphicCode, c2: GraphicCode, use_pua: bool) -> Option<char> {
    symbol::lookup(((c1.get() as u16) << 8) | c2.get() as u16, use_pua)
}

/// 英数集合の文字を得る。
///
/// 標準サイズでは全角、小型・中型・超小型サイズでは半角の文字となる。
pub fn alnum(c: GraphicCode, size: CharSize) -> char {
    let c = c.get();
    match (c, size.is_small()) {
        (0x5C, false) => '￥',
        (0x7E, false) => '￣',
        (c, false) => char::from_u32(c as u32 + 0xFEE0).unwrap_or(char::REPLACEMENT_CHARACTER),
        (0x5C, true) => '¥',
        (0x7E, true) => '‾',
        (c, true) => c as char,
    }
}

/// 平仮名・片仮名集合で共通する記号。
#[inline]
fn kana_symbol(c: u8) -> Option<char> {
    Some(match c {
        0x79 => 'ー',
        0x7A => '。',
        0x7B => '「',
        0x7C => '」',
        0x7D => '、',
        0x7E => '・',
        _ => return None,
    })
}

/// 平仮名集合の文字を得る。
pub fn hira(c: GraphicCode) -> Option<char> {
    match c.get() {
        c @ 0x21..=0x73 => char::from_u32(0x3041 + (c - 0x21) as u32),
        0x77 => Some('ゝ'),
        0x78 => Some('ゞ'),
        c => kana_symbol(c),
    }
}

/// 片仮名集合の文字を得る。
pub fn kata(c: GraphicCode) -> Option<char> {
    match c.get() {
        c @ 0x21..=0x76 => char::from_u32(0x30A1 + (c - 0x21) as u32),
        0x77 => Some('ヽ'),
        0x78 => Some('ヾ'),
        c => kana_symbol(c),
    }
}

/// JIS X 0201片仮名集合の文字を得る。
pub fn jisx_kata(c: GraphicCode) -> Option<char> {
    match c.get() {
        c @ 0x21..=0x5F => char::from_u32(0xFF61 + (c - 0x21) as u32),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gc(n: u8) -> GraphicCode {
        GraphicCode::new(n).unwrap()
    }

    #[test]
    fn test_kanji() {
        assert_eq!(kanji(gc(0x30), gc(0x21), false), Some('亜'));
        assert_eq!(kanji(gc(0x3B), gc(0x7A), false), Some('字'));
        assert_eq!(kanji(gc(0x24), gc(0x22), false), Some('あ'));
        assert_eq!(kanji(gc(0x21), gc(0x21), false), Some('\u{3000}'));
        assert_eq!(kanji(gc(0x7A), gc(0x50), false), Some('\u{1F14A}'));
        assert_eq!(kanji(gc(0x7A), gc(0x50), true), Some('\u{E0F8}'));
        // 追加漢字
        assert_eq!(kanji(gc(0x75), gc(0x21), false), Some('㐂'));
        assert_eq!(extra_symbol(gc(0x76), gc(0x39), true), Some('辻'));
        assert_eq!(extra_symbol(gc(0x7D), gc(0x21), false), Some('㈪'));
        // 未割り当て
        assert_eq!(kanji(gc(0x22), gc(0x2F), false), None);
    }

    #[test]
    fn test_alnum() {
        assert_eq!(alnum(gc(0x41), CharSize::Normal), 'Ａ');
        assert_eq!(alnum(gc(0x41), CharSize::Middle), 'A');
        assert_eq!(alnum(gc(0x5C), CharSize::Normal), '￥');
        assert_eq!(alnum(gc(0x5C), CharSize::Small), '¥');
        assert_eq!(alnum(gc(0x7E), CharSize::Tiny), '‾');
    }

    #[test]
    fn test_kana() {
        assert_eq!(hira(gc(0x21)), Some('ぁ'));
        assert_eq!(hira(gc(0x73)), Some('ん'));
        assert_eq!(hira(gc(0x74)), None);
        assert_eq!(hira(gc(0x7B)), Some('「'));
        assert_eq!(kata(gc(0x46)), Some('テ'));
        assert_eq!(kata(gc(0x76)), Some('ヶ'));
        assert_eq!(kata(gc(0x78)), Some('ヾ'));
        assert_eq!(jisx_kata(gc(0x31)), Some('ｱ'));
        assert_eq!(jisx_kata(gc(0x60)), None);
    }
}
