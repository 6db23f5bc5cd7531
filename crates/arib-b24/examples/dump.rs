use std::path::PathBuf;

use arib_b24::eight::{Locale, TokenizerOptions};
use arib_b24::pes::caption::{CaptionCharCode, CaptionData, DataUnit};
use arib_b24::pes::drcs::Drcs;
use arib_b24::pes::IndependentPes;
use arib_b24::{ParseOptions, Parser, ParserState};

#[derive(Debug)]
struct AppArgs {
    oneseg: bool,
    use_pua: bool,
    magnification: f64,
    paths: Vec<PathBuf>,
}

impl AppArgs {
    const HELP: &str = "\
独立PESとして保存された字幕を読み込み、解釈した結果を表示するコマンド

USAGE:
  dump [OPTIONS] [PATH]...

FLAGS:
  -h, --help           このヘルプを表示する
  --oneseg             ワンセグの字幕として読み込む
  --pua                追加記号をPUAの文字とする

OPTIONS:
  --magnification N    座標や大きさに掛ける倍率 [default: 1]

ARGS:
  <PATH>...            data_identifierから始まる独立PESのファイル。順に読み込まれる
";

    pub fn parse() -> Result<AppArgs, Box<dyn std::error::Error>> {
        let mut args = pico_args::Arguments::from_env();

        if args.contains(["-h", "--help"]) {
            println!("{}", Self::HELP);
            std::process::exit(0);
        }

        let oneseg = args.contains("--oneseg");
        let use_pua = args.contains("--pua");
        let magnification = args.opt_value_from_str("--magnification")?.unwrap_or(1.);

        let paths = args
            .finish()
            .into_iter()
            .map(PathBuf::from)
            .collect::<Vec<_>>();
        if paths.is_empty() {
            return Err("ファイルが指定されていない".into());
        }

        Ok(AppArgs {
            oneseg,
            use_pua,
            magnification,
            paths,
        })
    }
}

fn print_drcs(data: &[u8], two_byte: bool) {
    let Some(drcs) = Drcs::read(data) else {
        log::warn!("DRCSの読み込みに失敗");
        return;
    };

    for code in &drcs.codes {
        for font in &code.fonts {
            let Some(pattern) = font.data.uncompressed() else { continue };
            println!(
                "DRCS {:?}: {}x{} ({}bpp)",
                code.drcs_char(two_byte),
                pattern.width,
                pattern.height,
                pattern.bits_per_pixel(),
            );
            for y in 0..pattern.height {
                let line: String = (0..pattern.width)
                    .map(|x| match pattern.pixel(x, y) {
                        Some(0) | None => ' ',
                        Some(_) => '#',
                    })
                    .collect();
                println!("  |{}|", line);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = AppArgs::parse()?;

    env_logger::init();

    let locale = if args.oneseg {
        Locale::JapaneseOneSeg
    } else {
        Locale::Japanese
    };
    let options = TokenizerOptions {
        use_pua: args.use_pua,
        ..TokenizerOptions::new(locale)
    };
    let mut parser = Parser::new(
        ParserState::default(),
        ParseOptions {
            magnification: args.magnification,
        },
    );

    // 言語番号ごとの文字符号化方式
    let mut char_codes = [CaptionCharCode::EightBit; 8];

    for path in &args.paths {
        let data = std::fs::read(path)?;
        let Some(pes) = IndependentPes::read(&data) else {
            log::error!("'{}'は独立PESではない", path.display());
            continue;
        };
        let Some(caption) = CaptionData::read(pes.payload) else {
            log::error!("'{}'のデータグループが不正", path.display());
            continue;
        };

        let (data_units, char_code) = match caption {
            CaptionData::Management(management) => {
                println!("[{:?}] 字幕管理データ: {:?}", pes.tag, management.tmd);
                for lang in &management.languages {
                    println!(
                        "  言語{}: {} {:?} {:?}",
                        lang.language_tag, lang.lang_code, lang.format, lang.tcs
                    );
                    if let Some(c) = char_codes.get_mut(lang.language_tag as usize) {
                        *c = lang.tcs;
                    }
                }
                (management.data_units, CaptionCharCode::EightBit)
            }
            CaptionData::Statement(statement) => {
                println!(
                    "[{:?}] 字幕文データ: 言語{} {:?}",
                    pes.tag, statement.language_index, statement.tmd
                );
                let char_code = char_codes[statement.language_index as usize & 0b111];
                (statement.data_units, char_code)
            }
        };

        for unit in data_units {
            match unit {
                DataUnit::StatementBody(body) => {
                    let tokens = match char_code {
                        CaptionCharCode::EightBit => {
                            let tokenized = arib_b24::eight::tokenize(body, &options);
                            if let Some(fault) = tokenized.fault {
                                log::warn!("途中で読み込みを中断：{}", fault);
                            }
                            tokenized.tokens
                        }
                        CaptionCharCode::UCS => match arib_b24::utf8::tokenize(body) {
                            Ok(tokens) => tokens,
                            Err(e) => {
                                log::error!("UTF-8符号の読み込みに失敗：{}", e);
                                continue;
                            }
                        },
                        CaptionCharCode::Reserved(v) => {
                            log::error!("知らない文字符号化方式：{}", v);
                            continue;
                        }
                    };

                    for parsed in parser.parse(&tokens) {
                        let state = &parsed.state;
                        println!(
                            "  ({:7.1}, {:7.1}) {:?} fg={:02X} bg={:02X} {:?}",
                            state.x,
                            state.y,
                            state.char_size,
                            state.foreground,
                            state.background,
                            parsed.token,
                        );
                    }
                }
                DataUnit::DrcsSb(data) => print_drcs(data, false),
                DataUnit::DrcsDb(data) => print_drcs(data, true),
                DataUnit::Bitmap(data) => println!("  ビットマップ: {}バイト", data.len()),
            }
        }
    }

    Ok(())
}
