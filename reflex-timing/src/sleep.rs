use std::time::Duration;

/// Sleeps close to `duration` using the tightest waiting primitive the
/// platform offers. Plain `thread::sleep` can round up to a full scheduler
/// quantum on some targets, which is too coarse near a stimulus deadline.
pub fn precise_sleep(duration: Duration) {
    #[cfg(target_os = "linux")]
    linux_sleep(duration);
    #[cfg(target_os = "windows")]
    windows_sleep(duration);
    #[cfg(target_os = "macos")]
    macos_sleep(duration);
    #[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
    std::thread::sleep(duration);
}

#[cfg(target_os = "linux")]
fn linux_sleep(duration: Duration) {
    use libc::{clock_nanosleep, timespec, CLOCK_MONOTONIC};

    let req = timespec {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_nsec: duration.subsec_nanos() as libc::c_long,
    };

    unsafe {
        clock_nanosleep(CLOCK_MONOTONIC, 0, &req, std::ptr::null_mut());
    }
}

#[cfg(target_os = "windows")]
fn windows_sleep(duration: Duration) {
    use windows::Win32::Foundation::CloseHandle;
    use windows::Win32::System::Threading::{
        CreateWaitableTimerW, SetWaitableTimer, WaitForSingleObject, INFINITE,
    };

    // Negative due time is relative, in 100 ns units.
    let due = -((duration.as_nanos() / 100) as i64);

    unsafe {
        let Ok(timer) = CreateWaitableTimerW(None, true, None) else {
            std::thread::sleep(duration);
            return;
        };
        if SetWaitableTimer(timer, &due, 0, None, None, false).is_ok() {
            WaitForSingleObject(timer, INFINITE);
        } else {
            std::thread::sleep(duration);
        }
        let _ = CloseHandle(timer);
    }
}

#[cfg(target_os = "macos")]
fn macos_sleep(duration: Duration) {
    use mach2::mach_time::{mach_absolute_time, mach_timebase_info, mach_timebase_info_data_t};

    // Sub-100us waits spin on the mach clock; the kernel sleep handles the
    // rest.
    if duration.as_nanos() < 100_000 {
        unsafe {
            let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
            mach_timebase_info(&mut timebase);
            let start = mach_absolute_time();
            let target =
                duration.as_nanos() as u64 * timebase.denom as u64 / timebase.numer as u64;
            while mach_absolute_time() - start < target {
                std::hint::spin_loop();
            }
        }
    } else {
        std::thread::sleep(duration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn sleeps_at_least_the_requested_duration() {
        let start = Instant::now();
        precise_sleep(Duration::from_millis(2));
        assert!(start.elapsed() >= Duration::from_millis(1));
    }
}
