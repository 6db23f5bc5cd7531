//! 漢字集合の85区から94区に割り当てられた追加漢字と追加記号。
//!
//! 90区から94区の各記号はUnicodeの標準の文字と、私用領域（PUA）の文字の両方に対応する。
//! PUAの文字は`0x7A50`を`U+E0F8`として区点順に連続して割り当てられる。

use fxhash::{FxHashMap, FxHashSet};
use once_cell::sync::Lazy;

/// PUAの割り当てが始まる符号。
const PUA_FIRST_CODE: u16 = 0x7A50;

/// [`PUA_FIRST_CODE`]に割り当てられるPUAの文字。
const PUA_FIRST_CHAR: u32 = 0xE0F8;

/// 割り当てのない符号。
const NONE: u32 = 0;

/// Unicodeに対応する文字がなく、PUAの文字のみを持つ符号。
const PUA_ONLY: u32 = 1;

/// 追加記号の、各区の先頭の符号から順に割り当てられる文字。
static SYMBOLS: &[(u16, &[u32])] = &[
    // 90区
    (
        0x7A50,
        &[
            0x1F14A, 0x1F14C, 0x1F13F, 0x1F146, 0x1F14B, 0x1F210, 0x1F211, 0x1F212,
            0x1F213, 0x1F142, 0x1F214, 0x1F215, 0x1F216, 0x1F14D, 0x1F131, 0x1F13D,
            0x2B1B, 0x2B24, 0x1F217, 0x1F218, 0x1F219, 0x1F21A, 0x1F21B, 0x26BF,
            0x1F21C, 0x1F21D, 0x1F21E, 0x1F21F, 0x1F220, 0x1F221, 0x1F222, 0x1F223,
            0x1F224, 0x1F225, 0x1F14E, 0x3299, 0x1F200,
        ],
    ),
    // 91区
    (
        0x7B21,
        &[
            0x26CC, 0x26CD, 0x2757, 0x26CF, 0x26D0, 0x26D1, NONE, 0x26D2,
            0x26D5, 0x26D3, 0x26D4, NONE, NONE, NONE, NONE, 0x1F17F,
            0x1F18A, NONE, NONE, 0x26D6, 0x26D7, 0x26D8, 0x26D9, 0x26DA,
            0x26DB, 0x26DC, 0x26DD, 0x26DE, 0x26DF, 0x26E0, 0x26E1, 0x2B55,
            0x3248, 0x3249, 0x324A, 0x324B, 0x324C, 0x324D, 0x324E, 0x324F,
            NONE, NONE, 0x2491, 0x2492, 0x2493, 0x26E3, 0x2B56, 0x2B57,
            0x2B58, 0x2B59, 0x2613, 0x328B, 0x3012, 0x26E8, 0x3246, 0x3245,
            0x26E9, 0x0FD6, 0x26EA, 0x26EB, 0x26EC, 0x2668, 0x26ED, 0x26EE,
            0x26EF, 0x2693, 0x2708, 0x26F0, 0x26F1, 0x26F2, 0x26F3, 0x26F4,
            0x26F5, 0x1F157, 0x24B9, 0x24C8, 0x26F6, 0x1F15F, 0x1F18B, 0x1F18D,
            0x1F18C, 0x1F179, 0x26F7, 0x26F8, 0x26F9, 0x26FA, 0x1F17B, 0x260E,
            0x26FB, 0x26FC, 0x26FD, 0x26FE, 0x1F17C, 0x26FF,
        ],
    ),
    // 92区
    (
        0x7C21,
        &[
            0x27A1, 0x2B05, 0x2B06, 0x2B07, 0x2B2F, 0x2B2E, 0x5E74, 0x6708,
            0x65E5, 0x5186, 0x33A1, 0x33A5, 0x339D, 0x33A0, 0x33A4, 0x1F100,
            0x2488, 0x2489, 0x248A, 0x248B, 0x248C, 0x248D, 0x248E, 0x248F,
            0x2490, 0x6C0F, 0x526F, 0x5143, 0x6545, 0x524D, 0x1F21F, 0x1F101,
            0x1F102, 0x1F103, 0x1F104, 0x1F105, 0x1F106, 0x1F107, 0x1F108, 0x1F109,
            0x1F10A, 0x3233, 0x3236, 0x3232, 0x3231, 0x3239, 0x3244, 0x25B6,
            0x25C0, 0x3016, 0x3017, 0x27D0, 0x00B2, 0x00B3, 0x1F12D, PUA_ONLY,
            PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY,
            PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY,
            PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY,
            PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, PUA_ONLY, 0x1F12C, 0x1F12B, PUA_ONLY,
            0x1F190, 0x1F226, 0x213B,
        ],
    ),
    // 93区
    (
        0x7D21,
        &[
            0x322A, 0x322B, 0x322C, 0x322D, 0x322E, 0x322F, 0x3230, 0x3237,
            0x337E, 0x337D, 0x337C, 0x337B, 0x2116, 0x2121, 0x3036, 0x26BE,
            0x1F240, 0x1F241, 0x1F242, 0x1F243, 0x1F244, 0x1F245, 0x1F246, 0x1F247,
            0x1F248, 0x1F12A, 0x1F227, 0x1F228, 0x1F229, 0x1F214, 0x1F22A, 0x1F22B,
            0x1F22C, 0x1F22D, 0x1F22E, 0x1F22F, 0x1F230, 0x1F231, 0x2113, 0x338F,
            0x3390, 0x33CA, 0x339E, 0x33A2, 0x3371, NONE, NONE, 0x00BD,
            0x2189, 0x2153, 0x2154, 0x00BC, 0x00BE, 0x2155, 0x2156, 0x2157,
            0x2158, 0x2159, 0x215A, 0x2150, 0x215B, 0x2151, 0x2152, 0x2600,
            0x2601, 0x2602, 0x26C4, 0x2616, 0x2617, 0x26C9, 0x26CA, 0x2666,
            0x2665, 0x2663, 0x2660, 0x26CB, 0x29BF, 0x203C, 0x2049, 0x26C5,
            0x2614, 0x26C6, 0x2603, 0x26C7, 0x26A1, PUA_ONLY, 0x26C8, 0x269E,
            0x269F, 0x266C, 0x260E,
        ],
    ),
    // 94区
    (
        0x7E21,
        &[
            0x2160, 0x2161, 0x2162, 0x2163, 0x2164, 0x2165, 0x2166, 0x2167,
            0x2168, 0x2169, 0x216A, 0x216B, 0x2470, 0x2471, 0x2472, 0x2473,
            0x2474, 0x2475, 0x2476, 0x2477, 0x2478, 0x2479, 0x247A, 0x247B,
            0x247C, 0x247D, 0x247E, 0x247F, 0x3251, 0x3252, 0x3253, 0x3254,
            0x1F110, 0x1F111, 0x1F112, 0x1F113, 0x1F114, 0x1F115, 0x1F116, 0x1F117,
            0x1F118, 0x1F119, 0x1F11A, 0x1F11B, 0x1F11C, 0x1F11D, 0x1F11E, 0x1F11F,
            0x1F120, 0x1F121, 0x1F122, 0x1F123, 0x1F124, 0x1F125, 0x1F126, 0x1F127,
            0x1F128, 0x1F129, 0x3255, 0x3256, 0x3257, 0x3258, 0x3259, 0x325A,
            0x2460, 0x2461, 0x2462, 0x2463, 0x2464, 0x2465, 0x2466, 0x2467,
            0x2468, 0x2469, 0x246A, 0x246B, 0x246C, 0x246D, 0x246E, 0x246F,
            0x2776, 0x2777, 0x2778, 0x2779, 0x277A, 0x277B, 0x277C, 0x277D,
            0x277E, 0x277F, 0x24EB, 0x24EC, 0x325B,
        ],
    ),
];

/// 追加漢字の、各区の先頭の符号から順に割り当てられる文字。
static KANJI: &[(u16, &[u32])] = &[
    // 85区
    (
        0x7521,
        &[
            0x3402, 0x20158, 0x4EFD, 0x4EFF, 0x4F9A, 0x4FC9, 0x509C, 0x511E,
            0x51BC, 0x351F, 0x5307, 0x5361, 0x536C, 0x8A79, 0x20BB7, 0x544D,
            0x5496, 0x549C, 0x54A9, 0x550E, 0x554A, 0x5672, 0x56E4, 0x5733,
            0x5734, 0xFA10, 0x5880, 0x59E4, 0x5A23, 0x5A55, 0x5BEC, 0xFA11,
            0x37E2, 0x5EAC, 0x5F34, 0x5F45, 0x5FB7, 0x6017, 0x6075, 0x6130,
            0x6624, 0x66C8, 0x66D9, 0x66FA, 0x66FB, 0x6852, 0x9FC4, 0x6911,
            0x693B, 0x6A45, 0x6A91, 0x6ADB, 0x233CC, 0x233FE, 0x235C4, 0x6BF1,
            0x6CE0, 0x6D2E, 0xFA45, 0x6DBF, 0x6DCA, 0x6DF8, 0xFA46, 0x6F5E,
            0x6FF9, 0x7064, 0xFA6C, 0x242EE, 0x7147, 0x71C1, 0x7200, 0x739F,
            0x73A8, 0x73C9, 0x73D6, 0x741B, 0x7421, 0xFA4A, 0x7426, 0x742A,
            0x742C, 0x7439, 0x744B, 0x3EDA, 0x7575, 0x7581, 0x7772, 0x4093,
            0x78C8, 0x78E0, 0x7947, 0x79AE, 0x9FC6, 0x4103,
        ],
    ),
    // 86区
    (
        0x7621,
        &[
            0x9FC5, 0x79DA, 0x7A1E, 0x7B7F, 0x7C31, 0x4264, 0x7D8B, 0x7FA1,
            0x8118, 0x813A, 0xFA6D, 0x82AE, 0x845B, 0x84DC, 0x84EC, 0x8559,
            0x85CE, 0x8755, 0x87EC, 0x880B, 0x88F5, 0x89D2, 0x8AF6, 0x8DCE,
            0x8FBB, 0x8FF6, 0x90DD, 0x9127, 0x912D, 0x91B2, 0x9233, 0x9288,
            0x9321, 0x9348, 0x9592, 0x96DE, 0x9903, 0x9940, 0x9AD9, 0x9BD6,
            0x9DD7, 0x9EB4, 0x9EB5,
        ],
    ),
];

/// 追加記号と追加漢字の対応表。
struct SymbolTable {
    /// 符号からUnicodeの文字。PUAの文字しか持たない記号は含まない。
    unicode: FxHashMap<u16, char>,
    /// PUAの文字しか持たない記号の符号。
    pua_only: FxHashSet<u16>,
    /// PUAの文字からUnicodeの文字。
    from_pua: FxHashMap<char, char>,
}

fn entries(rows: &'static [(u16, &'static [u32])]) -> impl Iterator<Item = (u16, u32)> {
    rows.iter()
        .flat_map(|&(first, chars)| (first..).zip(chars.iter().copied()))
        .filter(|&(_, c)| c != NONE)
}

static TABLE: Lazy<SymbolTable> = Lazy::new(|| {
    let mut unicode = FxHashMap::default();
    let mut pua_only = FxHashSet::default();
    let mut from_pua = FxHashMap::default();
    for (code, c) in entries(SYMBOLS) {
        if c == PUA_ONLY {
            pua_only.insert(code);
            continue;
        }
        let Some(c) = char::from_u32(c) else {
            continue;
        };
        unicode.insert(code, c);
        if let Some(pua) = pua(code) {
            from_pua.insert(pua, c);
        }
    }
    for (code, c) in entries(KANJI) {
        if let Some(c) = char::from_u32(c) {
            unicode.insert(code, c);
        }
    }
    SymbolTable {
        unicode,
        pua_only,
        from_pua,
    }
});

/// 符号に割り当てられるPUAの文字を得る。
fn pua(code: u16) -> Option<char> {
    let linear = |code: u16| ((code >> 8) as u32 - 0x21) * 94 + ((code & 0xFF) as u32 - 0x21);
    if !(PUA_FIRST_CODE..=0x7E7E).contains(&code) || !(0x21..=0x7E).contains(&(code & 0xFF)) {
        return None;
    }
    char::from_u32(PUA_FIRST_CHAR + linear(code) - linear(PUA_FIRST_CODE))
}

/// 追加漢字・追加記号の符号（1バイト目を上位、2バイト目を下位に持つ）から文字を得る。
///
/// `use_pua`が`true`の場合、追加記号はPUAの文字となる。
/// Unicodeに対応する文字のない追加記号は`use_pua`によらずPUAの文字となる。
/// 割り当てのない符号の場合は`None`を返す。
pub fn lookup(code: u16, use_pua: bool) -> Option<char> {
    if TABLE.pua_only.contains(&code) {
        return pua(code);
    }

    let c = TABLE.unicode.get(&code).copied()?;
    match pua(code) {
        Some(pua) if use_pua => Some(pua),
        _ => Some(c),
    }
}

/// 追加記号のPUAの文字をUnicodeの標準の文字に変換する。
///
/// 追加記号のPUAの文字でないか、対応する標準の文字がない場合は`None`を返す。
pub fn from_pua(c: char) -> Option<char> {
    TABLE.from_pua.get(&c).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        // [HV]
        assert_eq!(lookup(0x7A50, false), Some('\u{1F14A}'));
        assert_eq!(lookup(0x7A50, true), Some('\u{E0F8}'));
        // [字]
        assert_eq!(lookup(0x7A74, false), Some('\u{1F200}'));
        assert_eq!(lookup(0x7A4F, false), None);
        assert_eq!(lookup(0x7A75, false), None);

        // 91区
        assert_eq!(lookup(0x7B21, false), Some('⛌'));
        assert_eq!(lookup(0x7B30, false), Some('\u{1F17F}'));
        assert_eq!(lookup(0x7B40, false), Some('⭕'));
        assert_eq!(lookup(0x7B7E, false), Some('⛿'));
        assert_eq!(lookup(0x7B27, false), None);

        // 92区
        assert_eq!(lookup(0x7C27, false), Some('年'));
        assert_eq!(lookup(0x7C31, false), Some('⒈'));
        assert_eq!(lookup(0x7C3A, false), Some('氏'));
        assert_eq!(lookup(0x7C49, false), Some('\u{1F10A}'));
        assert_eq!(lookup(0x7C4D, false), Some('㈱'));
        assert_eq!(lookup(0x7C79, false), Some('\u{1F190}'));

        // 93区
        assert_eq!(lookup(0x7D21, false), Some('㈪'));
        assert_eq!(lookup(0x7D31, false), Some('\u{1F240}'));
        assert_eq!(lookup(0x7D5F, false), Some('⅒'));
        assert_eq!(lookup(0x7D7B, false), Some('☎'));
        assert_eq!(lookup(0x7D4E, false), None);

        // 94区
        assert_eq!(lookup(0x7E21, false), Some('Ⅰ'));
        assert_eq!(lookup(0x7E3C, false), Some('⑿'));
        assert_eq!(lookup(0x7E41, false), Some('\u{1F110}'));
        assert_eq!(lookup(0x7E7D, false), Some('㉛'));
        assert_eq!(lookup(0x7E7E, false), None);

        assert_eq!(lookup(0x3021, false), None);
    }

    #[test]
    fn test_kanji() {
        // 85区・86区の追加漢字はPUAの文字にならない
        assert_eq!(lookup(0x7521, false), Some('㐂'));
        assert_eq!(lookup(0x7521, true), Some('㐂'));
        assert_eq!(lookup(0x752F, false), Some('\u{20BB7}'));
        assert_eq!(lookup(0x7639, false), Some('辻'));
        assert_eq!(lookup(0x764B, false), Some('麵'));
        assert_eq!(lookup(0x764C, false), None);
        assert_eq!(lookup(0x7721, false), None);
    }

    #[test]
    fn test_pua() {
        // 90区の次は91区の先頭
        assert_eq!(pua(0x7A7E), Some('\u{E126}'));
        assert_eq!(pua(0x7B21), Some('\u{E127}'));
        assert_eq!(pua(0x7A21), None);

        let c = lookup(0x7C27, true).unwrap();
        assert_eq!(from_pua(c), Some('年'));
        assert_eq!(from_pua('あ'), None);

        // 標準の文字がない記号
        assert_eq!(lookup(0x7C58, false), Some('\u{E1BC}'));
        assert_eq!(lookup(0x7C58, true), Some('\u{E1BC}'));
        assert_eq!(from_pua('\u{E1BC}'), None);
    }
}
