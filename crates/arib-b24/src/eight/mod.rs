//! ARIB STD-B24で規定される8単位符号。
//!
//! 符号集合の指示・呼び出しを伴う符号列を[`Token`]の列に分解する。

pub mod char;
pub mod symbol;
pub mod table;

mod decode;

use fxhash::FxHashMap;

use crate::error::TokenizeError;
use crate::token::{DrcsChar, Token};

pub use self::char::{Designator, GraphicSet};

/// 8単位符号をデコードする際の符号集合の初期状態。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// 初期状態でG0～G3に指示する符号集合。
    pub graphic_sets: [GraphicSet; 4],

    /// 初期状態でGLに呼び出す符号集合。
    pub gl: Designator,

    /// 初期状態でGRに呼び出す符号集合。
    pub gr: Designator,
}

impl Options {
    /// 通常の符号列をデコードする際のオプション。
    pub const DEFAULT: Options = Options {
        graphic_sets: [
            GraphicSet::Kanji,
            GraphicSet::Alnum,
            GraphicSet::Hira,
            GraphicSet::Kata,
        ],
        gl: Designator::G0,
        gr: Designator::G2,
    };

    /// 字幕の符号列をデコードする際のオプション。
    pub const CAPTION: Options = Options {
        graphic_sets: [
            GraphicSet::Kanji,
            GraphicSet::Alnum,
            GraphicSet::Hira,
            GraphicSet::Macro,
        ],
        gl: Designator::G0,
        gr: Designator::G2,
    };

    /// ワンセグにおける字幕の符号列をデコードする際のオプション。
    pub const ONESEG_CAPTION: Options = Options {
        graphic_sets: [
            GraphicSet::Kanji,
            GraphicSet::Drcs(1),
            GraphicSet::Hira,
            GraphicSet::Macro,
        ],
        gl: Designator::G1,
        gr: Designator::G0,
    };
}

impl Default for Options {
    fn default() -> Self {
        Options::DEFAULT
    }
}

/// 字幕の言語環境。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Locale {
    /// 日本語の字幕。
    #[default]
    Japanese,
    /// ワンセグにおける日本語の字幕。
    JapaneseOneSeg,
}

impl Locale {
    /// 言語環境に対応する符号集合の初期状態。
    pub fn options(self) -> Options {
        match self {
            Locale::Japanese => Options::CAPTION,
            Locale::JapaneseOneSeg => Options::ONESEG_CAPTION,
        }
    }
}

/// [`tokenize`]の設定。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizerOptions {
    /// 符号集合の初期状態。
    pub options: Options,

    /// 追加記号をUnicodeの標準の文字ではなくPUAの文字とするかどうか。
    pub use_pua: bool,

    /// DRCSを置き換える文字。
    ///
    /// ここに登録されたDRCSは[`Token::Drcs`]ではなく、
    /// `drcs`が`true`の[`Token::Character`]として出力される。
    pub drcs_replacements: FxHashMap<DrcsChar, String>,
}

impl TokenizerOptions {
    /// `locale`に従った設定を生成する。
    pub fn new(locale: Locale) -> TokenizerOptions {
        TokenizerOptions {
            options: locale.options(),
            use_pua: false,
            drcs_replacements: FxHashMap::default(),
        }
    }
}

impl Default for TokenizerOptions {
    fn default() -> Self {
        TokenizerOptions::new(Locale::default())
    }
}

/// [`tokenize`]の結果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    /// 読み取ったトークン。
    pub tokens: Vec<Token>,

    /// 読み取りを中断させたエラー。
    ///
    /// エラーがあった場合でも`tokens`にはそれまでに読み取ったトークンが格納される。
    pub fault: Option<TokenizeError>,
}

impl Tokenized {
    /// エラーがあれば`Err`として返す。
    pub fn into_result(self) -> Result<Vec<Token>, TokenizeError> {
        match self.fault {
            Some(e) => Err(e),
            None => Ok(self.tokens),
        }
    }
}

/// 8単位符号の符号列`bytes`をトークンに分解する。
///
/// 符号列が途中で終了していた場合、それまでのトークンと共にエラーを返す。
pub fn tokenize(bytes: &[u8], options: &TokenizerOptions) -> Tokenized {
    let mut tokens = Vec::new();
    let mut fault = None;
    for r in Tokens::new(bytes, options) {
        match r {
            Ok(token) => tokens.push(token),
            Err(e) => {
                log::debug!("tokenize: {}", e);
                fault = Some(e);
            }
        }
    }
    Tokenized { tokens, fault }
}

/// 8単位符号の符号列からトークンを順に読み取るイテレーター。
///
/// エラーを返した後は`None`を返す。
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    decoder: decode::Decoder<'a>,
    done: bool,
}

impl<'a> Tokens<'a> {
    /// `bytes`からトークンを読み取る`Tokens`を生成する。
    pub fn new(bytes: &'a [u8], options: &'a TokenizerOptions) -> Tokens<'a> {
        Tokens {
            decoder: decode::Decoder::new(bytes, options),
            done: false,
        }
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Result<Token, TokenizeError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.decoder.next_token() {
            Ok(Some(token)) => Some(Ok(token)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Tokens<'_> {}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use hex_literal::hex;

    use super::*;
    use crate::token::{Character, SizeControl};

    fn tokens(bytes: &[u8]) -> Vec<Token> {
        tokenize(bytes, &TokenizerOptions::default())
            .into_result()
            .unwrap()
    }

    fn chars(s: &str) -> Vec<Token> {
        s.chars().map(|c| Token::character(c)).collect()
    }

    #[test]
    fn test_kanji_hira() {
        // 字幕（漢字）、てすと（GRの平仮名）
        assert_eq!(
            tokens(&hex!("3B 7A 4B 6B C6 B9 C8")),
            chars("字幕てすと"),
        );
    }

    #[test]
    fn test_alnum_size() {
        // LS1でGLに英数、NSZで全角・MSZで半角
        assert_eq!(
            tokens(&hex!("0E 41 89 41 8A 41")),
            vec![
                Token::character('Ａ'),
                Token::MiddleSize,
                Token::character('A'),
                Token::NormalSize,
                Token::character('Ａ'),
            ],
        );
    }

    #[test]
    fn test_controls() {
        assert_eq!(
            tokens(&hex!("0C 9B 37 20 53 1C 48 45 90 55 20 7F")),
            vec![
                Token::ClearScreen,
                Token::SetWritingFormat(7),
                Token::ActivePositionSet(5, 8),
                Token::ColorControlBackground(5),
                Token::Space,
                Token::Delete,
            ],
        );
        assert_eq!(
            tokens(&hex!("8B 41")),
            vec![Token::CharacterSizeControl(SizeControl::DoubleHeight)],
        );
    }

    #[test]
    fn test_designation() {
        // ESC ( 1 でG0に片仮名
        assert_eq!(tokens(&hex!("1B 28 31 46")), chars("テ"));
        // ESC ) J、ESC ~ でGRにG1の英数
        assert_eq!(tokens(&hex!("1B 29 4A 1B 7E C1")), chars("Ａ"));
        // ESC n でGLにG2の平仮名
        assert_eq!(tokens(&hex!("1B 6E 22")), chars("あ"));
        // ESC $ ; で追加記号
        assert_eq!(tokens(&hex!("1B 24 3B 7A 50")), chars("\u{1F14A}"));
    }

    #[test]
    fn test_single_shift() {
        // SS2でG2の平仮名、次の文字は元のG0の漢字
        assert_eq!(tokens(&hex!("19 22 30 21")), chars("あ亜"));
    }

    #[test]
    fn test_unknown_designation() {
        // 未定義の1バイトGセットは空文字列
        assert_eq!(
            tokens(&hex!("1B 28 7B 21 22")),
            vec![Token::character(""), Token::character("")],
        );
        // 未定義の2バイトGセットは2バイトずつ読む
        assert_eq!(
            tokens(&hex!("1B 24 29 7B 0E 21 22")),
            vec![Token::character("")],
        );
    }

    #[test]
    fn test_drcs() {
        // ESC ) SP A でG1にDRCS-1
        assert_eq!(
            tokens(&hex!("1B 29 20 41 0E 21")),
            vec![Token::Drcs(DrcsChar { set: 1, code: 0x21 })],
        );
        // ESC $ ( SP @ でG0にDRCS-0
        assert_eq!(
            tokens(&hex!("1B 24 28 20 40 21 22")),
            vec![Token::Drcs(DrcsChar { set: 0, code: 0x2122 })],
        );

        let mut options = TokenizerOptions::default();
        options
            .drcs_replacements
            .insert(DrcsChar { set: 1, code: 0x21 }, "♪".to_string());
        let tokenized = tokenize(&hex!("1B 29 20 41 0E 21"), &options);
        assert_eq!(
            tokenized.tokens,
            vec![Token::Character(Character::from_drcs("♪"))],
        );
    }

    #[test]
    fn test_oneseg() {
        let options = TokenizerOptions::new(Locale::JapaneseOneSeg);
        // GLはDRCS-1、GRは漢字
        assert_eq!(
            tokenize(&hex!("21 B0 A1"), &options).tokens,
            vec![
                Token::Drcs(DrcsChar { set: 1, code: 0x21 }),
                Token::character('亜'),
            ],
        );
    }

    #[test]
    fn test_macro() {
        // 既定のマクロ0x60でG1に英数、G3にマクロを指示し、GRにG2を呼び出す
        assert_eq!(
            tokens(&hex!("1B 6F 60 0E 41")),
            vec![Token::character('Ａ')],
        );

        // 0x21にAPRを定義して実行
        assert_eq!(
            tokens(&hex!("95 41 21 0D 95 4F 1B 6F 21")),
            vec![Token::ActivePositionReturn, Token::ActivePositionReturn],
        );
        // 定義のみ
        assert_eq!(
            tokens(&hex!("95 40 21 0D 95 4F 1B 6F 21")),
            vec![Token::ActivePositionReturn],
        );
    }

    #[test]
    fn test_macro_invoking_itself() {
        // G3をGLに呼び出した状態で、0x21自身を呼び出すマクロを実行しても停止する
        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let tokenized = tokenize(
                &hex!("1B 6F 95 41 21 21 95 4F"),
                &TokenizerOptions::default(),
            );
            let _ = tx.send(tokenized);
        });
        let tokenized = rx
            .recv_timeout(std::time::Duration::from_secs(3))
            .unwrap();
        assert_eq!(tokenized, Tokenized { tokens: vec![], fault: None });

        // マクロ内で別のマクロを呼び出しても実行しない
        assert_eq!(
            tokens(&hex!("95 40 22 0D 95 4F 95 41 21 1B 6F 22 95 4F 0F 30 21")),
            chars("亜"),
        );
    }

    #[test]
    fn test_use_pua() {
        let options = TokenizerOptions {
            use_pua: true,
            ..TokenizerOptions::default()
        };
        assert_eq!(
            tokenize(&hex!("7A 50"), &options).tokens,
            vec![Token::character('\u{E0F8}')],
        );
    }

    #[test]
    fn test_truncated() {
        let tokenized = tokenize(&hex!("30 21 1C 48"), &TokenizerOptions::default());
        assert_eq!(tokenized.tokens, chars("亜"));
        assert_eq!(tokenized.fault, Some(TokenizeError::Truncated { offset: 2 }));

        let tokenized = tokenize(&hex!("30"), &TokenizerOptions::default());
        assert!(tokenized.tokens.is_empty());
        assert_matches!(tokenized.fault, Some(TokenizeError::Truncated { offset: 0 }));

        let tokenized = tokenize(&hex!("1B 24"), &TokenizerOptions::default());
        assert_matches!(tokenized.fault, Some(TokenizeError::Truncated { offset: 0 }));

        let bytes = hex!("9B 37");
        let options = TokenizerOptions::default();
        let mut iter = Tokens::new(&bytes, &options);
        assert_matches!(iter.next(), Some(Err(TokenizeError::Truncated { .. })));
        assert_matches!(iter.next(), None);
    }

    #[test]
    fn test_skipped_codes() {
        // NUL・BEL・CAN・RS・USは読み飛ばす
        assert_eq!(tokens(&hex!("00 07 18 1E 1F 0D")), vec![Token::ActivePositionReturn]);
        assert!(tokens(&[]).is_empty());
    }
}
