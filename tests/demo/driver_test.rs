/*!
 * Demo Driver Tests
 * Console output and termination for each demo
 */

use oom_policy::core::limits::DEMO_ITERATIONS;
use oom_policy::memory::{current_handler, AllocError, LimitedBackend, PolicyAllocator};
use oom_policy::{Console, Demo, DemoConfig, DemoDriver, Termination};
use pretty_assertions::assert_eq;

fn driver_with_limit(limit: usize, config: DemoConfig) -> DemoDriver {
    DemoDriver::new(
        PolicyAllocator::new(LimitedBackend::new(limit)),
        Console::captured(),
        config,
    )
}

fn progress_lines(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("count: {}", i)).collect()
}

#[test]
fn test_one_byte_requests_complete_for_every_demo() {
    for demo in Demo::ALL {
        let driver = DemoDriver::new(
            PolicyAllocator::system(),
            Console::captured(),
            DemoConfig::default().with_request_size(1),
        );

        assert_eq!(driver.run(demo).unwrap(), Termination::Completed, "demo {}", demo);

        let output = driver.console().output();
        assert!(!output.contains("Test Ende bei NULL"), "demo {}", demo);
        assert!(!output.contains("Exception"), "demo {}", demo);
        assert!(!output.contains("new handler"), "demo {}", demo);
        assert_eq!(driver.handler_calls(), 0);
    }
}

#[test]
fn test_progress_printed_for_null_demos() {
    for demo in [Demo::NullReturn, Demo::UncheckedNull] {
        let driver = driver_with_limit(1024, DemoConfig::default().with_request_size(1));
        driver.run(demo).unwrap();
        assert_eq!(driver.console().lines(), progress_lines(DEMO_ITERATIONS));
    }
}

#[test]
fn test_null_return_reports_first_index() {
    let driver = driver_with_limit(0, DemoConfig::default().with_request_size(64));

    assert_eq!(driver.run(Demo::NullReturn).unwrap(), Termination::Exit);
    assert_eq!(driver.console().lines(), vec!["count: 0", "Test Ende bei NULL: 0"]);
}

#[test]
fn test_unchecked_null_never_reaches_null_check() {
    let driver = driver_with_limit(256, DemoConfig::default().with_request_size(100));

    let termination = driver.run(Demo::UncheckedNull).unwrap();
    assert_eq!(
        termination,
        Termination::Unhandled(AllocError::Exhausted {
            requested: 100,
            align: 1
        })
    );
    assert_eq!(termination.exit_code(), None);
    assert_eq!(driver.console().lines(), progress_lines(3));
}

#[test]
fn test_exception_prints_once_then_aborts() {
    let driver = driver_with_limit(1000, DemoConfig::default().with_request_size(300));

    let termination = driver.run(Demo::Exception).unwrap();
    assert_eq!(termination, Termination::Abort);
    assert_eq!(
        driver.console().lines(),
        vec!["korrekt, Exception: memory allocation of 300 bytes failed"]
    );
}

#[test]
fn test_new_handler_marker_repeats_until_cap() {
    let config = DemoConfig::default()
        .with_request_size(1 << 20)
        .with_handler_limit(250);
    let driver = driver_with_limit(0, config);

    let termination = driver.run(Demo::NewHandler).unwrap();
    assert_eq!(termination, Termination::Exit);
    assert_eq!(driver.handler_calls(), 250);

    let lines = driver.console().lines();
    let markers = lines.iter().filter(|l| l.as_str() == "new handler ").count();
    assert_eq!(markers, 250);
    assert_eq!(
        lines.last().map(String::as_str),
        Some("test: memory allocation of 1048576 bytes failed")
    );
}

#[test]
fn test_new_handler_demo_restores_slot() {
    let config = DemoConfig::default().with_request_size(8).with_handler_limit(1);
    let driver = driver_with_limit(0, config);

    driver.run(Demo::NewHandler).unwrap();
    assert!(current_handler().is_none());
}

#[test]
fn test_default_config_uses_oversized_request() {
    let config = DemoConfig::default();
    assert_eq!(config.count, 16);
    assert!(config.request_size >= oom_policy::core::limits::GIB);
    assert_eq!(config.handler_limit, None);
}
