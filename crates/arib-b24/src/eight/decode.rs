//! 8単位符号のデコード。

use std::slice;

use super::char::{Designator, GraphicCode, GraphicSet, SetKind};
use super::{table, TokenizerOptions};
use crate::control::{self, ByteSource, Eof};
use crate::error::TokenizeError;
use crate::token::{CharSize, Character, DrcsChar, Token};

/// 辞書に文字がない場合の代替文字。
const PLACEHOLDER: &str = "\u{FFFD}";

/// 実行中のマクロ。
#[derive(Debug, Clone)]
struct CurrentMacro {
    /// マクロの番号。
    n: GraphicCode,
    /// マクロ内の位置。
    pos: usize,
}

/// マクロ符号集合。
// 常にマクロを保持すると無駄にヒープを消費してしまうので、
// MACRO符号でマクロが設定されるまでは静的変数`DEFAULT_MACROS`を参照する。
#[derive(Debug, Clone)]
struct Macros {
    macros: Option<Box<[Vec<u8>; 0x7E - 0x21 + 1]>>,
}

impl Macros {
    #[inline]
    fn new() -> Macros {
        Macros { macros: None }
    }

    /// `n`で指定された符号に定義されたマクロを取得する。
    #[inline]
    fn get(&self, n: GraphicCode) -> &[u8] {
        if let Some(ref macros) = self.macros {
            &macros[n.index()]
        } else {
            DEFAULT_MACROS[n.index()]
        }
    }

    /// `n`で指定された符号にマクロを定義する。
    fn set(&mut self, n: GraphicCode, makro: &[u8]) {
        let macros = match self.macros {
            Some(ref mut macros) => macros,
            None => {
                if makro == DEFAULT_MACROS[n.index()] {
                    return;
                }

                self.macros
                    .insert(crate::utils::boxed_array(|i| DEFAULT_MACROS[i].to_vec()))
            }
        };

        macros[n.index()] = makro.to_vec();
    }
}

/// ARIB STD-B24の8単位符号をトークンに分解する。
///
/// 符号集合の指示・呼び出しの状態は`Decoder`ごとに初期化され、他の符号列に持ち越されない。
#[derive(Debug, Clone)]
pub(super) struct Decoder<'a> {
    iter: slice::Iter<'a, u8>,
    len: usize,
    options: &'a TokenizerOptions,

    graphic_sets: [GraphicSet; 4],
    gl: Designator,
    gr: Designator,
    char_size: CharSize,

    macros: Macros,
    current_macro: Option<CurrentMacro>,
    /// 読み取り中の符号がマクロの中から始まったかどうか。
    in_macro: bool,
}

impl ByteSource for Decoder<'_> {
    fn read_byte(&mut self) -> Option<u8> {
        if let Some(cm) = &mut self.current_macro {
            let makro = self.macros.get(cm.n);
            let b = makro[cm.pos];

            cm.pos += 1;
            if cm.pos == makro.len() {
                self.current_macro = None;
            }

            Some(b)
        } else {
            self.iter.next().copied()
        }
    }
}

impl<'a> Decoder<'a> {
    /// `options`に従い`bytes`をデコードする`Decoder`を生成する。
    #[inline]
    pub fn new(bytes: &'a [u8], options: &'a TokenizerOptions) -> Decoder<'a> {
        Decoder {
            iter: bytes.iter(),
            len: bytes.len(),
            options,
            graphic_sets: options.options.graphic_sets,
            gl: options.options.gl,
            gr: options.options.gr,
            char_size: CharSize::Normal,
            macros: Macros::new(),
            current_macro: None,
            in_macro: false,
        }
    }

    /// 符号列の先頭からの、次に読み込む位置。
    #[inline]
    fn offset(&self) -> usize {
        self.len - self.iter.as_slice().len()
    }

    /// `n`個の符号を読み飛ばす。
    fn skip(&mut self, n: usize) -> Result<(), Eof> {
        for _ in 0..n {
            self.read_byte().ok_or(Eof)?;
        }
        Ok(())
    }

    fn cur_bytes(&self) -> &[u8] {
        if let Some(cm) = &self.current_macro {
            &self.macros.get(cm.n)[cm.pos..]
        } else {
            self.iter.as_slice()
        }
    }

    /// 符号の指示と図形符号からトークンを得る。
    fn get_graphic(&mut self, g: Designator, c1: GraphicCode) -> Result<Option<Token>, Eof> {
        let set = self.graphic_sets[g as usize];
        match set.kind() {
            SetKind::Macro => {
                // マクロ実行はネストできない、かつ空のマクロは実行しない
                if !self.in_macro && !self.macros.get(c1).is_empty() {
                    self.current_macro = Some(CurrentMacro { n: c1, pos: 0 });
                }
                return Ok(None);
            }
            SetKind::Character | SetKind::Drcs => {}
        }

        let c2 = if set.width() >= 2 {
            match GraphicCode::new(self.read_byte().ok_or(Eof)?) {
                Some(c2) => Some(c2),
                None => {
                    log::trace!("invalid second byte for {:?}", set);
                    return Ok(None);
                }
            }
        } else {
            None
        };

        Ok(Some(self.decode_graphic(set, c1, c2)))
    }

    /// 符号集合の辞書を引く。
    fn decode_graphic(&self, set: GraphicSet, c1: GraphicCode, c2: Option<GraphicCode>) -> Token {
        let use_pua = self.options.use_pua;
        let c = match (set, c2) {
            (GraphicSet::Kanji | GraphicSet::JisKanjiPlane1, Some(c2)) => {
                table::kanji(c1, c2, use_pua)
            }
            (GraphicSet::ExtraSymbols, Some(c2)) => table::extra_symbol(c1, c2, use_pua),
            (GraphicSet::Alnum | GraphicSet::PropAlnum, _) => {
                Some(table::alnum(c1, self.char_size))
            }
            (GraphicSet::Hira | GraphicSet::PropHira, _) => table::hira(c1),
            (GraphicSet::Kata | GraphicSet::PropKata, _) => table::kata(c1),
            (GraphicSet::JisXKata, _) => table::jisx_kata(c1),

            (GraphicSet::Drcs(set), c2) => {
                let code = match c2 {
                    Some(c2) => ((c1.get() as u16) << 8) | c2.get() as u16,
                    None => c1.get() as u16,
                };
                let drcs = DrcsChar { set, code };
                return match self.options.drcs_replacements.get(&drcs) {
                    Some(s) => Token::Character(Character::from_drcs(s.clone())),
                    None => Token::Drcs(drcs),
                };
            }

            (GraphicSet::Unknown(_), _) => return Token::character(""),

            // モザイク、JIS互換漢字2面
            _ => None,
        };

        match c {
            Some(c) => Token::Character(Character::new(c)),
            None => Token::character(PLACEHOLDER),
        }
    }

    /// 符号集合と次の符号からトークンを得る。
    fn read_graphic(&mut self, g: Designator) -> Result<Option<Token>, Eof> {
        let b = self.read_byte().ok_or(Eof)?;
        match GraphicCode::new(b) {
            Some(c1) => self.get_graphic(g, c1),
            None => {
                log::trace!("single shift to non-graphic: {:02X}", b);
                Ok(None)
            }
        }
    }

    /// エスケープを読み取る。
    fn read_esc(&mut self) -> Result<Option<Token>, Eof> {
        fn invoke_to_gl(this: &mut Decoder, g: Designator) -> Result<Option<Token>, Eof> {
            this.skip(1)?;
            this.gl = g;
            Ok(None)
        }
        fn invoke_to_gr(this: &mut Decoder, g: Designator) -> Result<Option<Token>, Eof> {
            this.skip(1)?;
            this.gr = g;
            Ok(None)
        }
        fn designate(
            this: &mut Decoder,
            read: usize,
            g: u8,
            set: Option<GraphicSet>,
            unknown_width: u8,
        ) -> Result<Option<Token>, Eof> {
            this.skip(read)?;

            let Some(g) = Designator::from_intermediate(g) else {
                return Ok(None);
            };
            let set = set.unwrap_or_else(|| {
                log::trace!("unknown designation to {:?}", g);
                GraphicSet::Unknown(unknown_width)
            });
            this.graphic_sets[g as usize] = set;
            Ok(None)
        }

        match *self.cur_bytes() {
            [] => Err(Eof),

            // 符号の呼び出し

            // LS2
            [0x6E, ..] => invoke_to_gl(self, Designator::G2),
            // LS3
            [0x6F, ..] => invoke_to_gl(self, Designator::G3),
            // LS1R
            [0x7E, ..] => invoke_to_gr(self, Designator::G1),
            // LS2R
            [0x7D, ..] => invoke_to_gr(self, Designator::G2),
            // LS3R
            [0x7C, ..] => invoke_to_gr(self, Designator::G3),

            // 符号の指示

            // 2バイトDRCS
            [0x24, g @ 0x28..=0x2B, 0x20, f, ..] => {
                let set = (f == 0x40).then_some(GraphicSet::Drcs(0));
                designate(self, 4, g, set, 2)
            }
            // 2バイトGセット
            [0x24, g @ 0x28..=0x2B, f, ..] if f != 0x20 => {
                designate(self, 3, g, GraphicSet::from_final_2(f), 2)
            }
            [0x24, f, ..] if !(0x28..=0x2B).contains(&f) => {
                designate(self, 2, 0x28, GraphicSet::from_final_2(f), 2)
            }
            // 1バイトDRCS・マクロ
            [g @ 0x28..=0x2B, 0x20, f, ..] => {
                designate(self, 3, g, GraphicSet::from_final_drcs_1(f), 1)
            }
            // 1バイトGセット
            [g @ 0x28..=0x2B, f, ..] if f != 0x20 => {
                designate(self, 2, g, GraphicSet::from_final_1(f), 1)
            }

            // 途中で終わっている指示
            [0x24 | 0x28..=0x2B, ..] => Err(Eof),

            [b, ..] => {
                log::trace!("unknown ESC: {:02X}", b);
                self.skip(1)?;
                Ok(None)
            }
        }
    }

    /// マクロの定義を読み取る。
    fn read_macro(&mut self) -> Result<Option<Token>, Eof> {
        log::trace!("read_macro");

        // マクロ実行中にマクロが定義されることはない
        if self.in_macro {
            log::trace!("MACRO in a macro");
            return Ok(None);
        }

        let run = match *self.iter.next().ok_or(Eof)? {
            0x40 => false,
            0x41 => true,
            p1 => {
                log::trace!("unknown MACRO: p1={:02X}", p1);
                return Ok(None);
            }
        };
        let mc @ 0x21..=0x7E = *self.iter.next().ok_or(Eof)? else {
            return Ok(None);
        };
        let mc = GraphicCode(mc);

        // マクロ本体は同じ符号列内のMACRO 0x4Fまで
        let start = self.iter.as_slice();
        let Some(len) = start.windows(2).position(|w| *w == [control::MACRO, 0x4F]) else {
            return Err(Eof);
        };
        let body = &start[..len];
        if body
            .windows(2)
            .any(|w| w[0] == control::MACRO && matches!(w[1], 0x40 | 0x41))
        {
            // マクロはネストできない
            log::trace!("nested MACRO");
        }

        self.iter = start[len + 2..].iter();
        self.macros.set(mc, body);

        if run && !body.is_empty() {
            self.current_macro = Some(CurrentMacro { n: mc, pos: 0 });
        }

        Ok(None)
    }

    /// 文字サイズを変えるトークンであれば英数集合の幅を切り替える。
    fn track_size(&mut self, token: &Token) {
        self.char_size = match *token {
            Token::SmallSize => CharSize::Small,
            Token::MiddleSize => CharSize::Middle,
            Token::NormalSize => CharSize::Normal,
            Token::CharacterSizeControl(size) => size.into(),
            _ => return,
        };
    }

    /// 次のトークンを得る。
    ///
    /// 符号列の終端に達した場合は`Ok(None)`を返す。
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        loop {
            let offset = self.offset();
            self.in_macro = self.current_macro.is_some();
            let Some(b) = self.read_byte() else {
                return Ok(None);
            };

            let r = match b {
                // GL
                c1 @ 0x21..=0x7E => self.get_graphic(self.gl, GraphicCode(c1)),
                // GR
                c1 @ 0xA1..=0xFE => self.get_graphic(self.gr, GraphicCode(c1 & 0x7F)),

                control::SS2 => self.read_graphic(Designator::G2),
                control::SS3 => self.read_graphic(Designator::G3),
                control::LS0 => {
                    self.gl = Designator::G0;
                    Ok(None)
                }
                control::LS1 => {
                    self.gl = Designator::G1;
                    Ok(None)
                }
                control::ESC => self.read_esc(),
                control::MACRO => self.read_macro(),

                0x00..=0x20 | 0x7F => control::read_c0(self, b),
                0x80..=0x9F => control::read_c1(self, b),

                // 0xA0, 0xFF
                b => {
                    log::trace!("unknown arib char: {:02X}", b);
                    Ok(None)
                }
            };

            match r {
                Ok(Some(token)) => {
                    self.track_size(&token);
                    return Ok(Some(token));
                }
                Ok(None) => {}
                Err(Eof) => {
                    self.current_macro = None;
                    self.iter = [].iter();
                    return Err(TokenizeError::Truncated { offset });
                }
            }
        }
    }
}

static DEFAULT_MACROS: [&[u8]; 0x7E - 0x21 + 1] = {
    let mut macros: [&[u8]; 0x7E - 0x21 + 1] = [b""; 0x7E - 0x21 + 1];
    let defaults: [&[u8]; 16] = [
        b"\x1B\x24\x42\x1B\x29\x4A\x1B\x2A\x30\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x24\x42\x1B\x29\x31\x1B\x2A\x30\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x24\x42\x1B\x29\x20\x41\x1B\x2A\x30\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x32\x1B\x29\x34\x1B\x2A\x35\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x32\x1B\x29\x33\x1B\x2A\x35\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x32\x1B\x29\x20\x41\x1B\x2A\x35\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x20\x41\x1B\x29\x20\x42\x1B\x2A\x20\x43\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x20\x44\x1B\x29\x20\x45\x1B\x2A\x20\x46\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x20\x47\x1B\x29\x20\x48\x1B\x2A\x20\x49\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x20\x4A\x1B\x29\x20\x4B\x1B\x2A\x20\x4C\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x20\x4D\x1B\x29\x20\x4E\x1B\x2A\x20\x4F\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x24\x42\x1B\x29\x20\x42\x1B\x2A\x30\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x24\x42\x1B\x29\x20\x43\x1B\x2A\x30\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x24\x42\x1B\x29\x20\x44\x1B\x2A\x30\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x31\x1B\x29\x30\x1B\x2A\x4A\x1B\x2B\x20\x70\x0F\x1B\x7D",
        b"\x1B\x28\x4A\x1B\x29\x32\x1B\x2A\x20\x41\x1B\x2B\x20\x70\x0F\x1B\x7D",
    ];

    // 0x60..=0x6F
    let mut i = 0;
    while i < defaults.len() {
        macros[0x60 - 0x21 + i] = defaults[i];
        i += 1;
    }
    macros
};
