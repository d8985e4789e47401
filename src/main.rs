/*!
 * OOM Policy Demo - Main Entry Point
 *
 * Runs the demo selected at build time against the system allocator:
 * - default: new-handler (handler-hook policy)
 * - `demo-exception`: caught allocation error, then abort
 * - `demo-null-return`: checked null return, then exit
 * - `demo-unchecked-null`: unchecked allocation error reaching the top level
 */

use std::process;
use tracing::{error, info};

use oom_policy::{init_tracing, Console, Demo, DemoConfig, DemoDriver, PolicyAllocator, Termination};

fn main() -> miette::Result<()> {
    // Initialize structured tracing
    init_tracing();

    let demo = Demo::selected();
    let driver = DemoDriver::new(PolicyAllocator::system(), Console::stdout(), DemoConfig::default());

    match driver.run(demo)? {
        Termination::Completed => {
            info!(demo = %demo, "all allocations succeeded");
            Ok(())
        }
        Termination::Exit => process::exit(0),
        Termination::Abort => {
            error!(demo = %demo, "aborting after allocation failure");
            process::abort()
        }
        Termination::Unhandled(err) => {
            error!(demo = %demo, error = %err, "unhandled allocation failure");
            match err.layout() {
                Some(layout) => std::alloc::handle_alloc_error(layout),
                None => process::abort(),
            }
        }
    }
}
