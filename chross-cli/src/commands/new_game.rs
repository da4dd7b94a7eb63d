//! Mint a new game.

use chross_types::GameKey;

/// Run the new-game command.
pub fn run() {
    let key = GameKey::generate();

    println!("Game key: {}", key);
    println!("Channel:  {}", key.channel_name());
    println!();
    println!("North joins with: ?k={}&p=n", key);
    println!("South joins with: ?k={}&p=s", key);
    println!("Observers use:    ?k={}", key);
}
