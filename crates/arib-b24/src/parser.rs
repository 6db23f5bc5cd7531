//! トークン列を解釈し、描画に必要な状態を付与する。
//!
//! [`Parser`]は字幕の1トラックにつき1つ生成し、
//! 到着したトークン列を順に[`Parser::parse`]に渡す。

use crate::token::{
    CharSize, ConcealmentMode, FlashingMode, Ornament, PatternPolarity, Token, WritingMode,
};

/// 行末までの繰り返しで1行に書く文字数の上限。
const MAX_LINE_CELLS: u32 = 4096;

/// 書字方向。
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WritingDirection {
    /// 横書き。
    #[default]
    Horizontal,
    /// 縦書き。
    Vertical,
}

/// [`Parser`]の設定。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParseOptions {
    /// 座標や大きさに掛ける倍率。
    pub magnification: f64,
}

impl Default for ParseOptions {
    fn default() -> Self {
        ParseOptions { magnification: 1. }
    }
}

/// 次に描画されるトークンの見た目と位置を決める状態。
///
/// 座標や大きさはすべて倍率を掛けた後の値である。
/// 位置は横書きでは文字の左下、縦書きでは文字の左上を指す。
#[derive(Debug, Clone, PartialEq)]
pub struct ParserState {
    /// 動作位置の横方向の座標。
    pub x: f64,
    /// 動作位置の縦方向の座標。
    pub y: f64,

    /// 書式の横方向のドット数。
    pub plane_width: f64,
    /// 書式の縦方向のドット数。
    pub plane_height: f64,

    /// 表示領域の横方向のドット数。
    pub area_width: f64,
    /// 表示領域の縦方向のドット数。
    pub area_height: f64,

    /// 表示領域の左端の座標。
    pub margin_x: f64,
    /// 表示領域の上端の座標。
    pub margin_y: f64,

    /// 文字の横方向のドット数。
    pub font_width: f64,
    /// 文字の縦方向のドット数。
    pub font_height: f64,

    /// 字間隔。
    pub horizontal_spacing: f64,
    /// 行間隔。
    pub vertical_spacing: f64,

    /// 文字サイズ。
    pub char_size: CharSize,

    /// パレット番号。
    pub pallet: u8,
    /// 前景色のカラーマップアドレス（パレット番号×16＋色番号）。
    pub foreground: u8,
    /// 背景色のカラーマップアドレス。
    pub background: u8,
    /// 前中間色のカラーマップアドレス。
    pub half_foreground: u8,
    /// 背中間色のカラーマップアドレス。
    pub half_background: u8,
    /// ラスタ色。
    pub raster_color: u8,

    /// フラッシング。
    pub flashing: FlashingMode,
    /// 囲み。`0`は囲みなし。
    pub highlight: u8,
    /// 文字飾り。
    pub ornament: Ornament,
    /// コンシールメント。
    pub concealment: ConcealmentMode,
    /// パターン極性。
    pub polarity: PatternPolarity,
    /// 書込みモード。
    pub writing_mode: WritingMode,
    /// アンダーライン。
    pub underline: bool,

    /// 書字方向。
    pub direction: WritingDirection,

    /// 座標や大きさに掛けられている倍率。
    pub magnification: f64,
}

impl Default for ParserState {
    fn default() -> Self {
        let mut state = ParserState {
            x: 0.,
            y: 0.,
            plane_width: 960.,
            plane_height: 540.,
            area_width: 960.,
            area_height: 540.,
            margin_x: 0.,
            margin_y: 0.,
            font_width: 36.,
            font_height: 36.,
            horizontal_spacing: 4.,
            vertical_spacing: 24.,
            char_size: CharSize::Normal,
            pallet: 0,
            foreground: 7,
            background: 8,
            half_foreground: 7,
            half_background: 8,
            raster_color: 8,
            flashing: FlashingMode::Stop,
            highlight: 0,
            ornament: Ornament::None,
            concealment: ConcealmentMode::Stop,
            polarity: PatternPolarity::Normal,
            writing_mode: WritingMode::Both,
            underline: false,
            direction: WritingDirection::Horizontal,
            magnification: 1.,
        };
        state.move_home();
        state
    }
}

impl ParserState {
    /// 座標や大きさに`magnification`を掛けた状態を返す。
    pub fn scaled(&self, magnification: f64) -> ParserState {
        ParserState {
            x: self.x * magnification,
            y: self.y * magnification,
            plane_width: self.plane_width * magnification,
            plane_height: self.plane_height * magnification,
            area_width: self.area_width * magnification,
            area_height: self.area_height * magnification,
            margin_x: self.margin_x * magnification,
            margin_y: self.margin_y * magnification,
            font_width: self.font_width * magnification,
            font_height: self.font_height * magnification,
            horizontal_spacing: self.horizontal_spacing * magnification,
            vertical_spacing: self.vertical_spacing * magnification,
            magnification: self.magnification * magnification,
            ..self.clone()
        }
    }

    /// 文字サイズを反映した文字の横方向の大きさ。
    #[inline]
    pub fn char_width(&self) -> f64 {
        self.font_width * self.char_size.magnification().0
    }

    /// 文字サイズを反映した文字の縦方向の大きさ。
    #[inline]
    pub fn char_height(&self) -> f64 {
        self.font_height * self.char_size.magnification().1
    }

    /// 書字方向に1文字進む量。
    pub fn char_advance(&self) -> f64 {
        let (mag_w, mag_h) = self.char_size.magnification();
        match self.direction {
            WritingDirection::Horizontal => (self.font_width + self.horizontal_spacing) * mag_w,
            WritingDirection::Vertical => (self.font_height + self.horizontal_spacing) * mag_h,
        }
    }

    /// 1行進む量。
    pub fn line_advance(&self) -> f64 {
        let (mag_w, mag_h) = self.char_size.magnification();
        match self.direction {
            WritingDirection::Horizontal => (self.font_height + self.vertical_spacing) * mag_h,
            WritingDirection::Vertical => (self.font_width + self.vertical_spacing) * mag_w,
        }
    }

    /// 表示領域の最初の行の先頭に移動する。
    fn move_home(&mut self) {
        match self.direction {
            WritingDirection::Horizontal => {
                self.x = self.margin_x;
                self.y = self.margin_y + self.line_advance();
            }
            WritingDirection::Vertical => {
                self.x = self.margin_x + self.area_width - self.line_advance();
                self.y = self.margin_y;
            }
        }
    }

    /// 1文字進め、行末を超えた場合は次の行の先頭に移動する。
    ///
    /// 改行した場合は`true`を返す。
    fn move_forward(&mut self) -> bool {
        let advance = self.char_advance();
        match self.direction {
            WritingDirection::Horizontal => {
                self.x += advance;
                if self.x - self.margin_x >= self.area_width {
                    self.x = self.margin_x;
                    self.y += self.line_advance();
                    return true;
                }
            }
            WritingDirection::Vertical => {
                self.y += advance;
                if self.y - self.margin_y >= self.area_height {
                    self.y = self.margin_y;
                    self.x -= self.line_advance();
                    return true;
                }
            }
        }
        false
    }

    /// 現在位置から行末までに書ける文字数。
    ///
    /// 1文字も進まない場合や値が有限でない場合は`1`を返す。
    fn remaining_cells(&self) -> u32 {
        let advance = self.char_advance();
        let (pos, extent) = match self.direction {
            WritingDirection::Horizontal => (self.x - self.margin_x, self.area_width),
            WritingDirection::Vertical => (self.y - self.margin_y, self.area_height),
        };
        let cells = ((extent - pos) / advance).ceil();
        if !advance.is_finite() || advance <= 0. || !(cells >= 1.) {
            return 1;
        }
        if cells > MAX_LINE_CELLS as f64 {
            log::debug!("too many cells to repeat: {}", cells);
            return MAX_LINE_CELLS;
        }
        cells as u32
    }

    /// 1文字戻り、行頭を超えた場合は前の行の末尾に移動する。
    fn move_backward(&mut self) {
        let advance = self.char_advance();
        match self.direction {
            WritingDirection::Horizontal => {
                self.x -= advance;
                if self.x < self.margin_x {
                    self.x = self.margin_x + self.area_width - advance;
                    self.y -= self.line_advance();
                }
            }
            WritingDirection::Vertical => {
                self.y -= advance;
                if self.y < self.margin_y {
                    self.y = self.margin_y + self.area_height - advance;
                    self.x += self.line_advance();
                }
            }
        }
    }

    /// `lines`行進める。負の値なら戻る。
    fn move_lines(&mut self, lines: f64) {
        let advance = self.line_advance() * lines;
        match self.direction {
            WritingDirection::Horizontal => self.y += advance,
            WritingDirection::Vertical => self.x -= advance,
        }
    }

    /// 次の行の先頭に移動する。
    fn move_return(&mut self) {
        match self.direction {
            WritingDirection::Horizontal => self.x = self.margin_x,
            WritingDirection::Vertical => self.y = self.margin_y,
        }
        self.move_lines(1.);
    }

    /// 表示領域の`row`行`col`列目に移動する。
    fn move_to(&mut self, col: u8, row: u8) {
        let col = col as f64 * self.char_advance();
        let row = (row as f64 + 1.) * self.line_advance();
        match self.direction {
            WritingDirection::Horizontal => {
                self.x = self.margin_x + col;
                self.y = self.margin_y + row;
            }
            WritingDirection::Vertical => {
                self.x = self.margin_x + self.area_width - row;
                self.y = self.margin_y + col;
            }
        }
    }

    /// SWFの書式を設定する。
    fn set_writing_format(&mut self, format: u8) -> bool {
        let (width, height, direction) = match format {
            5 => (1920., 1080., WritingDirection::Horizontal),
            6 => (1920., 1080., WritingDirection::Vertical),
            7 => (960., 540., WritingDirection::Horizontal),
            8 => (960., 540., WritingDirection::Vertical),
            9 => (720., 480., WritingDirection::Horizontal),
            10 => (720., 480., WritingDirection::Vertical),
            11 => (1280., 720., WritingDirection::Horizontal),
            12 => (1280., 720., WritingDirection::Vertical),
            _ => return false,
        };

        let m = self.magnification;
        self.plane_width = width * m;
        self.plane_height = height * m;
        self.area_width = width * m;
        self.area_height = height * m;
        self.margin_x = 0.;
        self.margin_y = 0.;
        self.direction = direction;
        self.move_home();
        true
    }

    #[inline]
    fn color(&self, n: u8) -> u8 {
        (self.pallet << 4) | (n & 0x0F)
    }
}

/// 状態と共に出力されるトークン。
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedToken {
    /// トークン。
    pub token: Token,
    /// トークンを処理する時点での状態。
    pub state: ParserState,
    /// 解釈時の設定。
    pub options: ParseOptions,
}

/// トークン列の解釈器。
///
/// 状態は[`Parser::parse`]の呼び出しを跨いで引き継がれる。
#[derive(Debug, Clone)]
pub struct Parser {
    initial: ParserState,
    state: ParserState,
    options: ParseOptions,
    repeat: Option<u8>,
}

impl Parser {
    /// `initial`を初期状態とする`Parser`を生成する。
    ///
    /// `initial`の座標や大きさには`options`の倍率が掛けられる。
    pub fn new(initial: ParserState, options: ParseOptions) -> Parser {
        let initial = initial.scaled(options.magnification);
        Parser {
            state: initial.clone(),
            initial,
            options,
            repeat: None,
        }
    }

    /// 現在の状態。
    #[inline]
    pub fn state(&self) -> &ParserState {
        &self.state
    }

    /// 設定。
    #[inline]
    pub fn options(&self) -> ParseOptions {
        self.options
    }

    /// 状態を初期状態に戻す。
    pub fn reset(&mut self) {
        self.state = self.initial.clone();
        self.repeat = None;
    }

    /// `tokens`を順に処理し、描画されるトークンと画面消去を状態と共に返す。
    pub fn parse(&mut self, tokens: &[Token]) -> Vec<ParsedToken> {
        let mut parsed = Vec::new();
        for token in tokens {
            self.step(token, &mut parsed);
        }
        parsed
    }

    fn emit(&self, token: &Token, parsed: &mut Vec<ParsedToken>) {
        parsed.push(ParsedToken {
            token: token.clone(),
            state: self.state.clone(),
            options: self.options,
        });
    }

    fn draw(&mut self, token: &Token, parsed: &mut Vec<ParsedToken>) {
        match self.repeat.take() {
            None | Some(1) => {
                self.emit(token, parsed);
                self.state.move_forward();
            }
            Some(0) => {
                for _ in 0..self.state.remaining_cells() {
                    self.emit(token, parsed);
                    if self.state.move_forward() {
                        break;
                    }
                }
            }
            Some(n) => {
                for _ in 0..n {
                    self.emit(token, parsed);
                    self.state.move_forward();
                }
            }
        }
    }

    fn step(&mut self, token: &Token, parsed: &mut Vec<ParsedToken>) {
        let m = self.options.magnification;
        let state = &mut self.state;
        match *token {
            Token::Character(_) | Token::Drcs(_) | Token::Space | Token::Delete => {
                self.draw(token, parsed);
            }

            Token::ClearScreen => {
                state.char_size = self.initial.char_size;
                state.pallet = self.initial.pallet;
                state.foreground = self.initial.foreground;
                state.background = self.initial.background;
                state.half_foreground = self.initial.half_foreground;
                state.half_background = self.initial.half_background;
                state.move_home();
                self.repeat = None;
                self.emit(token, parsed);
            }

            Token::ActivePositionBackward => state.move_backward(),
            Token::ActivePositionForward => {
                state.move_forward();
            }
            Token::ActivePositionDown => state.move_lines(1.),
            Token::ActivePositionUp => state.move_lines(-1.),
            Token::ActivePositionReturn => state.move_return(),
            Token::ParameterizedActivePositionForward(n) => {
                for _ in 0..n {
                    state.move_forward();
                }
            }
            Token::ActivePositionSet(x, y) => state.move_to(x, y),
            Token::ActiveCoordinatePositionSet(x, y) => {
                state.x = x as f64 * m;
                state.y = y as f64 * m;
            }

            Token::BlackForeground => state.foreground = state.color(0),
            Token::RedForeground => state.foreground = state.color(1),
            Token::GreenForeground => state.foreground = state.color(2),
            Token::YellowForeground => state.foreground = state.color(3),
            Token::BlueForeground => state.foreground = state.color(4),
            Token::MagentaForeground => state.foreground = state.color(5),
            Token::CyanForeground => state.foreground = state.color(6),
            Token::WhiteForeground => state.foreground = state.color(7),
            Token::ColorControlForeground(n) => state.foreground = state.color(n),
            Token::ColorControlBackground(n) => state.background = state.color(n),
            Token::ColorControlHalfForeground(n) => state.half_foreground = state.color(n),
            Token::ColorControlHalfBackground(n) => state.half_background = state.color(n),
            Token::PalletControl(p) => state.pallet = p,
            Token::RasterColourCommand(c) => state.raster_color = c,

            Token::SmallSize => state.char_size = CharSize::Small,
            Token::MiddleSize => state.char_size = CharSize::Middle,
            Token::NormalSize => state.char_size = CharSize::Normal,
            Token::CharacterSizeControl(sz) => state.char_size = sz.into(),

            Token::FlashingControl(mode) => state.flashing = mode,
            Token::ConcealmentControl(mode) => state.concealment = mode,
            Token::PatternPolarityControl(polarity) => state.polarity = polarity,
            Token::WritingModeModification(mode) => state.writing_mode = mode,
            Token::HilightingCharacterBlock(n) => state.highlight = n,
            Token::OrnamentControl(ornament) => state.ornament = ornament,
            Token::StartLining => state.underline = true,
            Token::StopLining => state.underline = false,
            Token::RepeatCharacter(n) => self.repeat = Some(n),

            Token::SetWritingFormat(format) => {
                if !state.set_writing_format(format) {
                    log::trace!("unsupported writing format: {}", format);
                }
            }
            Token::SetDisplayFormat(w, h) => {
                state.area_width = w as f64 * m;
                state.area_height = h as f64 * m;
            }
            Token::SetDisplayPosition(x, y) => {
                state.margin_x = x as f64 * m;
                state.margin_y = y as f64 * m;
            }
            Token::CharacterCompositionDotDesignation(w, h) => {
                state.font_width = w as f64 * m;
                state.font_height = h as f64 * m;
            }
            Token::SetHorizontalSpacing(n) => state.horizontal_spacing = n as f64 * m,
            Token::SetVerticalSpacing(n) => state.vertical_spacing = n as f64 * m,

            Token::TimeControlWait(_)
            | Token::TimeControlMode(_)
            | Token::TimeControlPresentationStart(_)
            | Token::TimeControlOffset(_)
            | Token::BuiltinSoundReplay(_) => {
                log::trace!("no state change: {:?}", token);
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Parser::new(ParserState::default(), ParseOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn caption_tokens() -> Vec<Token> {
        vec![
            Token::ClearScreen,
            Token::SetWritingFormat(7),
            Token::SetDisplayFormat(840, 480),
            Token::SetDisplayPosition(58, 29),
            Token::SetHorizontalSpacing(4),
            Token::SetVerticalSpacing(24),
            Token::CharacterCompositionDotDesignation(36, 36),
            Token::MiddleSize,
            Token::ActivePositionSet(17, 7),
            Token::PalletControl(0),
            Token::ColorControlBackground(8),
            Token::WhiteForeground,
            Token::character('('),
            Token::NormalSize,
            Token::character('テ'),
            Token::character('ス'),
            Token::character('ト'),
            Token::MiddleSize,
            Token::character(')'),
        ]
    }

    fn positions(parsed: &[ParsedToken]) -> Vec<(f64, f64, CharSize)> {
        parsed
            .iter()
            .filter(|p| p.token.is_drawable())
            .map(|p| (p.state.x, p.state.y, p.state.char_size))
            .collect()
    }

    #[test]
    fn test_threading() {
        let mut parser = Parser::default();
        let parsed = parser.parse(&caption_tokens());

        assert_eq!(parsed.len(), 6);
        assert_eq!(parsed[0].token, Token::ClearScreen);
        assert_eq!(
            positions(&parsed),
            vec![
                (398., 509., CharSize::Middle),
                (418., 509., CharSize::Normal),
                (458., 509., CharSize::Normal),
                (498., 509., CharSize::Normal),
                (538., 509., CharSize::Middle),
            ],
        );

        let state = &parsed[1].state;
        assert_eq!((state.area_width, state.area_height), (840., 480.));
        assert_eq!((state.margin_x, state.margin_y), (58., 29.));
        assert_eq!(state.foreground, 7);
        assert_eq!(state.background, 8);
        assert_eq!(parser.state().x, 558.);
    }

    #[test]
    fn test_magnification() {
        let options = ParseOptions { magnification: 2. };
        let mut parser = Parser::new(ParserState::default(), options);
        let parsed = parser.parse(&caption_tokens());

        assert_eq!(
            positions(&parsed),
            vec![
                (796., 1018., CharSize::Middle),
                (836., 1018., CharSize::Normal),
                (916., 1018., CharSize::Normal),
                (996., 1018., CharSize::Normal),
                (1076., 1018., CharSize::Middle),
            ],
        );
        assert!(parsed.iter().all(|p| p.options == options));
        assert!(parsed.iter().all(|p| p.state.magnification == 2.));
        assert_eq!(parsed[1].state.font_width, 72.);
    }

    #[test]
    fn test_flashing() {
        let mut parser = Parser::default();
        let parsed = parser.parse(&[
            Token::FlashingControl(FlashingMode::Normal),
            Token::character('a'),
            Token::character('b'),
            Token::FlashingControl(FlashingMode::Stop),
            Token::character('c'),
        ]);
        let flashing: Vec<_> = parsed.iter().map(|p| p.state.flashing).collect();
        assert_eq!(
            flashing,
            [FlashingMode::Normal, FlashingMode::Normal, FlashingMode::Stop],
        );
    }

    #[test]
    fn test_state_across_calls() {
        let mut parser = Parser::default();
        parser.parse(&[Token::RedForeground, Token::character('a')]);
        let parsed = parser.parse(&[Token::character('b')]);
        assert_eq!(parsed[0].state.foreground, 1);
        assert_eq!(parsed[0].state.x, 40.);

        parser.reset();
        assert_eq!(parser.state(), &ParserState::default());
    }

    #[test]
    fn test_clear_screen() {
        let mut parser = Parser::default();
        let parsed = parser.parse(&[
            Token::PalletControl(1),
            Token::ColorControlForeground(2),
            Token::SmallSize,
            Token::ActivePositionSet(3, 3),
            Token::ClearScreen,
            Token::character('a'),
        ]);
        assert_eq!(parsed.len(), 2);
        assert_matches!(parsed[0].token, Token::ClearScreen);
        let state = &parsed[1].state;
        assert_eq!(state.foreground, 7);
        assert_eq!(state.char_size, CharSize::Normal);
        assert_eq!((state.x, state.y), (0., 60.));
    }

    #[test]
    fn test_colors() {
        let mut parser = Parser::default();
        parser.parse(&[
            Token::PalletControl(2),
            Token::CyanForeground,
            Token::ColorControlBackground(5),
            Token::ColorControlHalfForeground(1),
            Token::ColorControlHalfBackground(15),
        ]);
        let state = parser.state();
        assert_eq!(state.foreground, 0x26);
        assert_eq!(state.background, 0x25);
        assert_eq!(state.half_foreground, 0x21);
        assert_eq!(state.half_background, 0x2F);
    }

    #[test]
    fn test_wrap() {
        let mut parser = Parser::default();
        parser.parse(&[Token::SetDisplayFormat(80, 120)]);
        let parsed = parser.parse(&[
            Token::character('a'),
            Token::character('b'),
            Token::character('c'),
        ]);
        assert_eq!(
            positions(&parsed)
                .into_iter()
                .map(|(x, y, _)| (x, y))
                .collect::<Vec<_>>(),
            vec![(0., 60.), (40., 60.), (0., 120.)],
        );
    }

    #[test]
    fn test_cursor_motion() {
        let mut parser = Parser::default();
        parser.parse(&[Token::ActivePositionSet(2, 1)]);
        assert_eq!((parser.state().x, parser.state().y), (80., 120.));

        parser.parse(&[Token::ActivePositionForward, Token::ActivePositionDown]);
        assert_eq!((parser.state().x, parser.state().y), (120., 180.));

        parser.parse(&[Token::ActivePositionBackward, Token::ActivePositionUp]);
        assert_eq!((parser.state().x, parser.state().y), (80., 120.));

        parser.parse(&[Token::ParameterizedActivePositionForward(3)]);
        assert_eq!(parser.state().x, 200.);

        parser.parse(&[Token::ActivePositionReturn]);
        assert_eq!((parser.state().x, parser.state().y), (0., 180.));

        // 行頭からの後退は前の行の末尾
        parser.parse(&[Token::ActivePositionBackward]);
        assert_eq!((parser.state().x, parser.state().y), (920., 120.));

        parser.parse(&[Token::ActiveCoordinatePositionSet(100, 200)]);
        assert_eq!((parser.state().x, parser.state().y), (100., 200.));
    }

    #[test]
    fn test_repeat() {
        let mut parser = Parser::default();
        let parsed = parser.parse(&[
            Token::RepeatCharacter(3),
            Token::character('a'),
            Token::character('b'),
        ]);
        assert_eq!(parsed.len(), 4);
        assert_eq!(parsed[3].state.x, 120.);

        // 0は行末まで
        let mut parser = Parser::default();
        parser.parse(&[Token::SetDisplayFormat(200, 120)]);
        let parsed = parser.parse(&[Token::RepeatCharacter(0), Token::Space]);
        assert_eq!(parsed.len(), 5);
        assert_eq!((parser.state().x, parser.state().y), (0., 120.));

        // 行の途中からは残りの分だけ
        let mut parser = Parser::default();
        parser.parse(&[Token::SetDisplayFormat(200, 120), Token::Space]);
        let parsed = parser.parse(&[Token::RepeatCharacter(0), Token::Space]);
        assert_eq!(parsed.len(), 4);

        // 進む量が非数
        let mut parser = Parser::new(
            ParserState::default(),
            ParseOptions {
                magnification: f64::NAN,
            },
        );
        let parsed = parser.parse(&[Token::RepeatCharacter(0), Token::Space]);
        assert_eq!(parsed.len(), 1);

        // 極端に広い表示領域
        let mut parser = Parser::default();
        let parsed = parser.parse(&[
            Token::SetDisplayFormat(u32::MAX, 120),
            Token::CharacterCompositionDotDesignation(1, 1),
            Token::SetHorizontalSpacing(0),
            Token::RepeatCharacter(0),
            Token::Space,
        ]);
        assert_eq!(parsed.len(), MAX_LINE_CELLS as usize);
    }

    #[test]
    fn test_vertical() {
        let mut parser = Parser::default();
        let parsed = parser.parse(&[
            Token::SetWritingFormat(8),
            Token::character('縦'),
            Token::character('書'),
            Token::ActivePositionSet(1, 0),
            Token::character('き'),
        ]);
        assert_eq!(parser.state().direction, WritingDirection::Vertical);
        assert_eq!(
            positions(&parsed)
                .into_iter()
                .map(|(x, y, _)| (x, y))
                .collect::<Vec<_>>(),
            vec![(900., 0.), (900., 40.), (900., 40.)],
        );
    }

    #[test]
    fn test_modes() {
        let mut parser = Parser::default();
        parser.parse(&[
            Token::StartLining,
            Token::HilightingCharacterBlock(15),
            Token::OrnamentControl(Ornament::Hemming(0x17)),
            Token::ConcealmentControl(ConcealmentMode::Replacing(2)),
            Token::PatternPolarityControl(PatternPolarity::Inverted1),
            Token::WritingModeModification(WritingMode::Foreground),
            Token::RasterColourCommand(3),
            Token::TimeControlWait(10),
            Token::SetWritingFormat(0),
        ]);
        let state = parser.state();
        assert!(state.underline);
        assert_eq!(state.highlight, 15);
        assert_eq!(state.ornament, Ornament::Hemming(0x17));
        assert_eq!(state.concealment, ConcealmentMode::Replacing(2));
        assert_eq!(state.polarity, PatternPolarity::Inverted1);
        assert_eq!(state.writing_mode, WritingMode::Foreground);
        assert_eq!(state.raster_color, 3);
        assert_eq!(state.direction, WritingDirection::Horizontal);
    }
}
