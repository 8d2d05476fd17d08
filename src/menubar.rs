use std::io::Write;

use crossterm::{queue, style};

/// Print one key hint, bolding any text inside `[...]` brackets.
/// Text outside brackets is printed dim.
pub fn print_key_hint(out: &mut impl Write, hint: &str) -> anyhow::Result<()> {
    let mut rest = hint;
    while !rest.is_empty() {
        let Some(open) = rest.find('[') else {
            print_dim(out, rest)?;
            break;
        };
        if open > 0 {
            print_dim(out, &rest[..open])?;
        }
        rest = &rest[open..];
        let Some(close) = rest.find(']') else {
            queue!(out, style::Print(rest))?;
            break;
        };
        queue!(
            out,
            style::SetAttribute(style::Attribute::Bold),
            style::Print(&rest[..=close]),
            style::SetAttribute(style::Attribute::Reset),
        )?;
        rest = &rest[close + 1..];
    }
    Ok(())
}

/// Print a row of key hints separated by two spaces.
pub fn print_key_hints(out: &mut impl Write, hints: &[String]) -> anyhow::Result<()> {
    queue!(out, style::Print(" "))?;
    for (i, hint) in hints.iter().enumerate() {
        if i > 0 {
            queue!(out, style::Print("  "))?;
        }
        print_key_hint(out, hint)?;
    }
    Ok(())
}

fn print_dim(out: &mut impl Write, text: &str) -> anyhow::Result<()> {
    queue!(
        out,
        style::SetAttribute(style::Attribute::Dim),
        style::Print(text),
        style::SetAttribute(style::Attribute::Reset),
    )?;
    Ok(())
}
