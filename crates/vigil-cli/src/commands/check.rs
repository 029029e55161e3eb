//! One-off interceptor evaluation.

use vigil_core::{Verdict, Warden};

pub fn run(warden: &Warden, url: &str) -> anyhow::Result<()> {
    match warden.check_navigation(0, url) {
        Verdict::Allow => println!("allow  {}", url),
        Verdict::Redirect(target) => {
            println!("block  {}", url);
            println!("    -> {}", target);
        }
    }
    Ok(())
}
