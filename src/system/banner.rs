use std::io::IsTerminal;

use crossterm::style::{Color, Stylize};

const TITLE_RGB: (u8, u8, u8) = (0x80, 0x4c, 0xff);
const SUBTITLE_RGB: (u8, u8, u8) = (0xff, 0x5f, 0xc8);

pub(crate) fn print_cli_banner(no_color: bool) {
    let use_color = !no_color && std::io::stdout().is_terminal();
    let title = format!("harstress v{}", env!("CARGO_PKG_VERSION"));
    let description = "HAR scenario load testing";
    if use_color {
        println!(
            "{}",
            title.as_str().bold().with(Color::Rgb {
                r: TITLE_RGB.0,
                g: TITLE_RGB.1,
                b: TITLE_RGB.2
            })
        );
        println!(
            "{}",
            description.with(Color::Rgb {
                r: SUBTITLE_RGB.0,
                g: SUBTITLE_RGB.1,
                b: SUBTITLE_RGB.2
            })
        );
    } else {
        println!("{title}");
        println!("{description}");
    }
}
