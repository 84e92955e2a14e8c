use cloudbutler::FactoryError;

pub fn print_success(message: &str) {
    tracing::info!("✓ {}", message);
}

pub fn print_info(message: &str) {
    tracing::info!("{}", message);
}

pub fn print_warning(message: &str) {
    tracing::warn!("{}", message);
}

/// Keep the first and last four characters of an access key id
pub fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 8), tail)
}

pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> Vec<String> {
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, header)| {
            rows.iter()
                .filter_map(|row| row.get(i))
                .map(|cell| cell.chars().count())
                .chain(std::iter::once(header.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let separator = widths
        .iter()
        .map(|w| "-".repeat(*w + 2))
        .collect::<Vec<_>>()
        .join("+");

    let format_row = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| format!(" {:<width$} ", cell, width = width))
            .collect::<Vec<_>>()
            .join("|")
    };

    let mut lines = vec![separator.clone(), format_row(headers.to_vec()), separator.clone()];
    for row in rows {
        let cells = (0..widths.len())
            .map(|i| row.get(i).map(String::as_str).unwrap_or(""))
            .collect();
        lines.push(format_row(cells));
    }
    lines.push(separator);
    lines
}

pub fn print_table(headers: &[&str], rows: &[Vec<String>], empty_message: &str) {
    if rows.is_empty() {
        println!("{}", empty_message);
        return;
    }

    for line in render_table(headers, rows) {
        println!("{}", line.trim_end());
    }
}

pub fn print_details(fields: &[(&str, String)]) {
    let label_width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
    for (label, value) in fields {
        println!("{:>width$}: {}", label, value, width = label_width);
    }
}

pub fn format_json_output<T: serde::Serialize>(data: &T) -> Result<String, FactoryError> {
    serde_json::to_string_pretty(data)
        .map_err(|e| FactoryError::ParseError(format!("JSON serialization error: {}", e)))
}
