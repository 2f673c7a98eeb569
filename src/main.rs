//! rcheckin main entrypoint.

use rcheckin::run;
use rcheckin::ui::messages::error;

fn main() {
    println!();
    if let Err(e) = run() {
        error(e);
        std::process::exit(1);
    }
}
