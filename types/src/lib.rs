pub mod boardgame;
pub mod outcome;
pub mod played_game;
pub mod player;
pub mod society;
pub mod task;
pub mod win_type;
pub mod window;

pub use boardgame::BoardGame;
pub use outcome::{derived_winner, Outcome};
pub use played_game::PlayedGame;
pub use player::Player;
pub use society::Society;
pub use task::Task;
pub use win_type::WinType;
pub use window::TimeWindow;
