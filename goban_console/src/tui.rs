use console::Style;
use goban::board::{Board, Player, Point, BOARD_SIZE};
use goban::chat::ChatMessage;
use goban::client::{ClientState, ReasoningEntry};
use itertools::Itertools;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

const TIME_FORMAT: &[BorrowedFormatItem] = format_description!("[hour]:[minute]:[second]");

fn format_square(ch: char) -> String {
    format!(" {ch}")
}

pub fn render_board(board: &Board, last_move: Option<Point>, cursor: Option<Point>) -> String {
    let wood = Style::new().color256(233).on_color256(180);
    let black_stone = Style::new().color256(16).on_color256(180);
    let white_stone = Style::new().color256(255).on_color256(180);
    let highlight = Style::new().reverse();

    let mut col_names = String::from("  ");
    for x in 0..BOARD_SIZE {
        col_names.push_str(&format!("{x:2}"));
    }
    col_names.push('\n');

    let mut ret = String::new();
    ret.push_str(&col_names);
    for y in 0..BOARD_SIZE {
        ret.push_str(&format!("{y:2}"));
        for x in 0..BOARD_SIZE {
            let point = Point::new(x, y).unwrap();
            let (ch, style) = match board.get(point) {
                Some(player) => {
                    let style = match player {
                        Player::Black => &black_stone,
                        Player::White => &white_stone,
                    };
                    (player.stone_char(), style)
                }
                None if point.is_star_point() => ('+', &wood),
                None => ('·', &wood),
            };
            let square = format_square(ch);
            let styled = if cursor == Some(point) || last_move == Some(point) {
                highlight.apply_to(square).to_string()
            } else {
                style.apply_to(square).to_string()
            };
            ret.push_str(&styled);
        }
        ret.push_str(&format!("{y:2}"));
        ret.push('\n');
    }
    ret.push_str(&col_names);
    ret
}

pub fn render_status(client_state: &ClientState) -> String {
    let Some(game_state) = client_state.game_state() else {
        return "Waiting for the server...".to_owned();
    };
    let mut ret = String::new();
    ret.push_str(&format!("Game {}.  ", client_state.game_id()));
    if let Some(me) = client_state.my_player_number() {
        ret.push_str(&format!("You are {me} {}.  ", me.stone_char()));
    }
    ret.push_str(&format!(
        "To play: {} {}.",
        game_state.current_player,
        game_state.current_player.stone_char()
    ));
    if let Some(thinker) = game_state.thinking {
        let style = Style::new().yellow().bold();
        ret.push_str(&format!("  {}", style.apply_to(format!("{thinker} is thinking..."))));
    } else if client_state.can_move() {
        let style = Style::new().green().bold();
        ret.push_str(&format!("  {}", style.apply_to("Your move.")));
    }
    ret
}

pub fn render_chat(chat_history: &[ChatMessage], max_lines: usize) -> String {
    let skipped = chat_history.len().saturating_sub(max_lines);
    chat_history[skipped..]
        .iter()
        .map(|msg| {
            let style = match msg.player {
                Player::Black => Style::new().cyan(),
                Player::White => Style::new().magenta(),
            };
            format!("{}: {}", style.apply_to(msg.player.to_string()), msg.message)
        })
        .join("\n")
}

pub fn render_reasoning(log: &[ReasoningEntry], max_entries: usize) -> String {
    let skipped = log.len().saturating_sub(max_entries);
    log[skipped..].iter().map(render_reasoning_entry).join("\n")
}

fn render_reasoning_entry(entry: &ReasoningEntry) -> String {
    let header_style = Style::new().dim();
    let timestamp = entry.received.format(TIME_FORMAT).unwrap_or_default();
    format!(
        "{} {} played {}: {}",
        header_style.apply_to(format!("[{timestamp}]")),
        entry.player,
        entry.point,
        entry.text
    )
}
