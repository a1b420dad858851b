mod config;
mod game;
mod leaderboard;
mod snake;
mod state;
mod term;

/// Pixel coordinate; signed so an out-of-bounds head is representable.
pub type Px = i16;
/// Board position in pixels, always a multiple of the unit size.
pub type Cell = (Px, Px);
/// Per-tick displacement; exactly one component is non-zero.
pub type Velocity = (Px, Px);

fn main() {
    let config = config::GameConfig::default();
    let mut app = game::SnakeApp::new(config);
    app.initialize();
    app.show_intro();

    loop {
        // The game loop takes care of exiting cleanly on CTRL+C
        app.play();
    }
}
