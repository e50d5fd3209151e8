#![forbid(unsafe_code)]
#![cfg_attr(feature = "strict", deny(warnings))]

mod client_main;
mod network;
mod tui;

use clap::{arg, Command};
use goban::board::Player;
use goban::event::{GameConfig, PlayerKind};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::new()
        .target(env_logger::Target::Stdout)
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let matches = Command::new("Goban")
        .author(clap::crate_authors!())
        .version(clap::crate_version!())
        .about("Console client for the LLM Go arena")
        .subcommand_required(true)
        .subcommand(
            Command::new("new")
                .about("Create a game on the server and attach to it")
                .arg(arg!(<server_address> "Server address, host[:port]"))
                .arg(arg!(--"black-model-url" <url> "Chat-completions endpoint for Black's AI"))
                .arg(arg!(--"black-model-name" <name> "Model name for Black's AI"))
                .arg(arg!(--"white-model-url" <url> "Chat-completions endpoint for White's AI"))
                .arg(arg!(--"white-model-name" <name> "Model name for White's AI"))
                .arg(
                    arg!(--"first-player" <color> "Which color plays first")
                        .value_parser(["black", "white"])
                        .default_value("black"),
                )
                .arg(arg!(--human "Human game: do not auto-trigger AI moves")),
        )
        .subcommand(
            Command::new("join")
                .about("Attach to an existing game")
                .arg(arg!(<server_address> "Server address, host[:port]"))
                .arg(arg!(<game_id> "Game ID")),
        )
        .subcommand(
            Command::new("state")
                .about("Print a one-shot snapshot of a game and exit")
                .arg(arg!(<server_address> "Server address, host[:port]"))
                .arg(arg!(<game_id> "Game ID")),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("new", sub_matches)) => {
            let server_address =
                sub_matches.get_one::<String>("server_address").unwrap().clone();
            let config = GameConfig {
                player_type: if sub_matches.get_flag("human") {
                    PlayerKind::Human
                } else {
                    PlayerKind::Ai
                },
                black_model_url: sub_matches.get_one::<String>("black-model-url").cloned(),
                black_model_name: sub_matches.get_one::<String>("black-model-name").cloned(),
                white_model_url: sub_matches.get_one::<String>("white-model-url").cloned(),
                white_model_name: sub_matches.get_one::<String>("white-model-name").cloned(),
                first_player: match sub_matches.get_one::<String>("first-player").unwrap().as_str()
                {
                    "black" => Player::Black,
                    "white" => Player::White,
                    _ => unreachable!("checked by the value parser"),
                },
            };
            let started = network::start_game(&server_address, &config)
                .map_err(|err| err.context("Cannot create a new game"))?;
            println!("Created game {}", started.game_id);
            Ok(client_main::run(client_main::ClientConfig {
                server_address,
                game_id: started.game_id,
            })?)
        }
        Some(("join", sub_matches)) => Ok(client_main::run(client_main::ClientConfig {
            server_address: sub_matches.get_one::<String>("server_address").unwrap().clone(),
            game_id: sub_matches.get_one::<String>("game_id").unwrap().clone(),
        })?),
        Some(("state", sub_matches)) => {
            let server_address = sub_matches.get_one::<String>("server_address").unwrap();
            let game_id = sub_matches.get_one::<String>("game_id").unwrap();
            let snapshot = network::game_state(server_address, game_id)?;
            println!("Game {}", snapshot.game_id);
            print!("{}", tui::render_board(&snapshot.board, None, None));
            println!(
                "To play: {} {}",
                snapshot.current_player,
                snapshot.current_player.stone_char()
            );
            Ok(())
        }
        _ => unreachable!("Exhausted list of subcommands and subcommand_required prevents `None`"),
    }
}
