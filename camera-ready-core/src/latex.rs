//! Rewrites accented characters as LaTeX escape sequences.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::ProceedingsError;

fn latex_escape(c: char) -> Option<&'static str> {
    let escaped = match c {
        'é' => "\\'e",
        'á' => "\\'a",
        'í' => "\\'i",
        'ó' => "\\'o",
        'ú' => "\\'u",
        'É' => "\\'E",
        'Á' => "\\'A",
        'Í' => "\\'I",
        'Ó' => "\\'O",
        'Ú' => "\\'U",
        'ñ' => "\\~n",
        'Ñ' => "\\~N",
        'à' => "\\`a",
        'è' => "\\`e",
        'ì' => "\\`i",
        'ò' => "\\`o",
        'ù' => "\\`u",
        'ä' => "\\\"a",
        'ë' => "\\\"e",
        'ï' => "\\\"i",
        'ö' => "\\\"o",
        'ü' => "\\\"u",
        'Ä' => "\\\"A",
        'Ë' => "\\\"E",
        'Ï' => "\\\"I",
        'Ö' => "\\\"O",
        'Ü' => "\\\"U",
        'ç' => "\\c{c}",
        'Ç' => "\\c{C}",
        _ => return None,
    };
    Some(escaped)
}

/// Replace every known accented character with its LaTeX form; everything else is kept as is.
pub fn convert_to_latex(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match latex_escape(c) {
            Some(escaped) => out.push_str(escaped),
            None => out.push(c),
        }
    }
    out
}

/// Read a UTF-8 file, convert it and write the result.
pub fn convert_file(input: &Path, output: &Path) -> Result<(), ProceedingsError> {
    let text = fs::read_to_string(input).map_err(|e| ProceedingsError::io(input, e))?;
    let converted = convert_to_latex(&text);
    fs::write(output, converted).map_err(|e| ProceedingsError::io(output, e))?;
    info!(
        input = %input.display(),
        output = %output.display(),
        "Converted file to LaTeX escapes"
    );
    Ok(())
}
