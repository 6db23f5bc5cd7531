//! ARIB STD-B24に基づいた字幕・文字スーパーを読み書きするためのクレート。
//!
//! 復号は次の順に行う。
//!
//! 1. [`pes::IndependentPes::read`]で独立PESを読み取る
//! 2. [`pes::caption::CaptionData::read`]でデータグループを読み取る
//! 3. 字幕本文のデータユニットを[`eight::tokenize`]または[`utf8::tokenize`]でトークンに分解する
//! 4. [`parser::Parser::parse`]で描画に必要な状態を付与する
//!
//! 符号化は[`encode::encode_tokens`]、[`pes::caption::CaptionData::to_bytes`]、
//! [`pes::IndependentPes::to_bytes`]の順に行う。

#![deny(missing_docs)]

pub mod crc16;
pub mod eight;
pub mod encode;
pub mod error;
pub mod lang;
pub mod parser;
pub mod pes;
pub mod token;
pub mod utf8;

mod control;
mod utils;

pub use error::{EncodeError, TokenizeError};
pub use lang::LangCode;
pub use parser::{ParseOptions, ParsedToken, Parser, ParserState};
pub use token::Token;
