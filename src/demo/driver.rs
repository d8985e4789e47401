/*!
 * Demo Driver
 * Runs one demo loop and reports how the process should end
 */

use super::{
    Console, Demo, DemoConfig, DemoResult, Termination, EXCEPTION_PREFIX, HANDLER_FALLBACK_PREFIX,
    NEW_HANDLER_MARKER, NULL_DETECTED_PREFIX, PROGRESS_PREFIX,
};
use crate::core::guard::HandlerScope;
use crate::core::text::to_text;
use crate::memory::{install_handler, new_handler, Block, NewHandler, PolicyAllocator};
use crate::monitoring::span_demo;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{info, warn};

/// Runs a [`Demo`] against a [`PolicyAllocator`]
///
/// Successful blocks are held until the run ends, so every iteration adds
/// to the pressure on the backend. The driver never terminates the process
/// itself; the caller acts on the returned [`Termination`].
pub struct DemoDriver {
    allocator: PolicyAllocator,
    console: Console,
    config: DemoConfig,
    handler_calls: Rc<Cell<usize>>,
}

impl DemoDriver {
    pub fn new(allocator: PolicyAllocator, console: Console, config: DemoConfig) -> Self {
        Self {
            allocator,
            console,
            config,
            handler_calls: Rc::new(Cell::new(0)),
        }
    }

    pub fn config(&self) -> &DemoConfig {
        &self.config
    }

    pub fn console(&self) -> &Console {
        &self.console
    }

    /// How often the demo new-handler has run
    pub fn handler_calls(&self) -> usize {
        self.handler_calls.get()
    }

    pub fn run(&self, demo: Demo) -> DemoResult<Termination> {
        let span = span_demo(&demo.to_string(), &demo.policy().to_string());
        let _entered = span.enter();

        info!(
            demo = %demo,
            policy = %demo.policy(),
            count = self.config.count,
            request_size = self.config.request_size,
            backend = self.allocator.backend_name(),
            "running demo"
        );

        let termination = match demo {
            Demo::NullReturn => self.run_null_return(),
            Demo::UncheckedNull => self.run_unchecked_null(),
            Demo::Exception => self.run_exception(),
            Demo::NewHandler => self.run_new_handler(),
        }?;

        info!(demo = %demo, termination = ?termination, "demo finished");
        Ok(termination)
    }

    /// Null-return policy: the result is checked and the run stops at the
    /// first empty one
    fn run_null_return(&self) -> DemoResult<Termination> {
        let mut held = Vec::with_capacity(self.config.count);

        for i in 0..self.config.count {
            self.progress(i)?;

            match self.allocator.allocate_or_null(self.config.request_size) {
                Some(block) => held.push(block),
                None => {
                    self.console
                        .line(format!("{}{}", NULL_DETECTED_PREFIX, to_text(&i)?))?;
                    return Ok(Termination::Exit);
                }
            }
        }

        Ok(Termination::Completed)
    }

    /// Misuse pattern: an error-raising allocation checked for null
    ///
    /// The null branch is dead code since a `Block` is never null. The error
    /// is not handled here and is handed to the top level instead.
    fn run_unchecked_null(&self) -> DemoResult<Termination> {
        let mut held: Vec<Block> = Vec::with_capacity(self.config.count);

        for i in 0..self.config.count {
            self.progress(i)?;

            let block = match self.allocator.try_allocate(self.config.request_size) {
                Ok(block) => block,
                Err(err) => return Ok(Termination::Unhandled(err)),
            };

            if block.as_ptr().is_null() {
                self.console
                    .line(format!("{}{}", NULL_DETECTED_PREFIX, to_text(&i)?))?;
                return Ok(Termination::Exit);
            }

            held.push(block);
        }

        Ok(Termination::Completed)
    }

    /// Exception policy: the error is caught, reported once, and the process
    /// aborts
    fn run_exception(&self) -> DemoResult<Termination> {
        let mut held = Vec::with_capacity(self.config.count);

        for _ in 0..self.config.count {
            match self.allocator.try_allocate(self.config.request_size) {
                Ok(block) => held.push(block),
                Err(err) => {
                    self.console.line(format!("{}{}", EXCEPTION_PREFIX, err))?;
                    return Ok(Termination::Abort);
                }
            }
        }

        Ok(Termination::Completed)
    }

    /// Handler-hook policy: the demo handler prints a marker and returns, so
    /// an unsatisfiable request retries until the handler goes away
    fn run_new_handler(&self) -> DemoResult<Termination> {
        let mut held = Vec::with_capacity(self.config.count);
        let _scope = HandlerScope::install(self.demo_handler());

        for _ in 0..self.config.count {
            match self.allocator.allocate_with_hook(self.config.request_size) {
                Ok(block) => held.push(block),
                Err(err) => {
                    self.console
                        .line(format!("{}{}", HANDLER_FALLBACK_PREFIX, err))?;
                    return Ok(Termination::Exit);
                }
            }
        }

        Ok(Termination::Completed)
    }

    fn demo_handler(&self) -> NewHandler {
        let console = self.console.clone();
        let calls = Rc::clone(&self.handler_calls);
        let limit = self.config.handler_limit;

        new_handler(move || {
            if let Err(e) = console.line(NEW_HANDLER_MARKER) {
                warn!(error = %e, "new-handler could not write marker");
            }

            calls.set(calls.get() + 1);
            if limit.is_some_and(|max| calls.get() >= max) {
                info!(invocations = calls.get(), "new-handler limit reached, removing handler");
                install_handler(None);
            }
        })
    }

    fn progress(&self, index: usize) -> DemoResult<()> {
        self.console
            .line(format!("{}{}", PROGRESS_PREFIX, to_text(&index)?))?;
        Ok(())
    }
}
