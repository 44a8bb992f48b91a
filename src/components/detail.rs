//! Transaction detail view.

use chrono::{TimeZone, Utc};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use crate::{
    domain::{
        detail::{ResolvedDetail, TxStatus},
        transaction::{format_coin, format_coin_aligned},
        view::{DetailSession, DetailState},
    },
    tui::Frame,
};

pub fn draw(f: &mut Frame, area: Rect, session: &DetailSession) {
    let lines = match &session.state {
        DetailState::Loading => vec![
            Line::from(""),
            Line::from(Span::styled(
                "Fetching transaction details...",
                Style::default().fg(Color::Yellow),
            )),
        ],
        DetailState::Failed(err) => vec![
            Line::from(""),
            Line::from(Span::styled(
                err.to_string(),
                Style::default().fg(Color::Red),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press ESC or BACKSPACE to return to the history table",
                Style::default().fg(Color::DarkGray),
            )),
        ],
        DetailState::Ready(resolved) => detail_lines(resolved),
    };

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title("Transaction Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(widget, area);
}

fn field(label: &'static str, value: String, color: Color) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<18}"), Style::default().fg(Color::DarkGray)),
        Span::styled(value, Style::default().fg(color)),
    ])
}

fn detail_lines(resolved: &ResolvedDetail) -> Vec<Line<'static>> {
    let detail = &resolved.detail;
    let tx = &detail.summary;

    let status_color = match resolved.status {
        TxStatus::Confirmed => Color::Green,
        TxStatus::Pending => Color::Yellow,
    };

    let date = Utc
        .timestamp_opt(tx.timestamp, 0)
        .single()
        .map(|t| format!("{} UTC", t.format("%Y-%m-%d %H:%M:%S")))
        .unwrap_or_else(|| tx.timestamp.to_string());

    let mut lines = vec![
        field("Hash", tx.hash.clone(), Color::Cyan),
        field(
            "Confirmations",
            detail.confirmations.to_string(),
            Color::Reset,
        ),
        field("Included in block", tx.block_height.to_string(), Color::Reset),
        field("Type", tx.tx_type.clone(), Color::Reset),
        field("Amount", format_coin(tx.amount), Color::Reset),
        field("Date", date, Color::Reset),
        field("Direction", tx.direction.to_string(), Color::Reset),
        field("Fee", format_coin(tx.fee), Color::Reset),
        field("Fee Rate", format!("{}/kB", format_coin(detail.fee_rate)), Color::Reset),
        field("Size", format!("{} Bytes", detail.size), Color::Reset),
        field("Status", resolved.status.to_string(), status_color),
        Line::from(""),
    ];

    lines.push(Line::from(Span::styled(
        "-Inputs-",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for input in &detail.inputs {
        lines.push(Line::from(vec![
            Span::raw(format_coin_aligned(input.amount, resolved.amount_width)),
            Span::raw("  "),
            Span::styled(
                format!("{} ({})", input.previous_outpoint, input.account_name),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "-Outputs-",
        Style::default().add_modifier(Modifier::BOLD),
    )));
    for output in &detail.outputs {
        let account = if output.is_mine {
            output.account_name.as_str()
        } else {
            "external"
        };
        lines.push(Line::from(vec![
            Span::raw(format_coin_aligned(output.amount, resolved.amount_width)),
            Span::raw("  "),
            Span::styled(
                format!("{} ({}) [{}]", output.address, account, output.script_type),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Press ESC or BACKSPACE to return to the history table",
        Style::default().fg(Color::DarkGray),
    )));

    lines
}
