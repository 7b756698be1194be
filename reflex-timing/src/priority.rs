use log::debug;

/// Raises scheduling priority for the lifetime of the guard and restores it
/// on drop, covering every exit path of a session. Failure to raise is
/// logged and otherwise ignored; the session still runs, with more jitter.
#[derive(Debug)]
#[must_use]
pub struct RealtimeGuard(());

impl RealtimeGuard {
    pub fn acquire() -> Self {
        raise();
        Self(())
    }
}

impl Drop for RealtimeGuard {
    fn drop(&mut self) {
        restore();
    }
}

#[cfg(target_os = "linux")]
fn raise() {
    // Niceness only; SCHED_FIFO needs privileges most setups lack.
    let rc = unsafe { libc::setpriority(libc::PRIO_PROCESS as _, 0, -11) };
    if rc != 0 {
        debug!("setpriority failed, continuing at normal priority");
    }
}

#[cfg(target_os = "linux")]
fn restore() {
    unsafe {
        libc::setpriority(libc::PRIO_PROCESS as _, 0, 0);
    }
}

#[cfg(target_os = "windows")]
fn raise() {
    use windows::Win32::System::Threading::{
        GetCurrentProcess, GetCurrentThread, SetPriorityClass, SetThreadPriority,
        HIGH_PRIORITY_CLASS, THREAD_PRIORITY_TIME_CRITICAL,
    };

    unsafe {
        if SetPriorityClass(GetCurrentProcess(), HIGH_PRIORITY_CLASS).is_err() {
            debug!("SetPriorityClass failed, continuing at normal priority");
        }
        if SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_TIME_CRITICAL).is_err() {
            debug!("SetThreadPriority failed, continuing at normal priority");
        }
    }
}

#[cfg(target_os = "windows")]
fn restore() {
    use windows::Win32::System::Threading::{
        GetCurrentProcess, GetCurrentThread, SetPriorityClass, SetThreadPriority,
        NORMAL_PRIORITY_CLASS, THREAD_PRIORITY_NORMAL,
    };

    unsafe {
        let _ = SetThreadPriority(GetCurrentThread(), THREAD_PRIORITY_NORMAL);
        let _ = SetPriorityClass(GetCurrentProcess(), NORMAL_PRIORITY_CLASS);
    }
}

#[cfg(target_os = "macos")]
fn raise() {
    use mach2::kern_return::KERN_SUCCESS;
    use mach2::mach_init::mach_thread_self;
    use mach2::mach_time::{mach_timebase_info, mach_timebase_info_data_t};
    use mach2::thread_act::thread_policy_set;
    use mach2::thread_policy::{
        thread_time_constraint_policy_data_t, THREAD_TIME_CONSTRAINT_POLICY,
        THREAD_TIME_CONSTRAINT_POLICY_COUNT,
    };

    unsafe {
        let mut timebase = mach_timebase_info_data_t { numer: 0, denom: 0 };
        mach_timebase_info(&mut timebase);
        let ns_to_abs = |ns: u64| ns * timebase.denom as u64 / timebase.numer as u64;

        let mut policy = thread_time_constraint_policy_data_t {
            period: ns_to_abs(1_000_000) as u32,
            computation: ns_to_abs(300_000) as u32,
            constraint: ns_to_abs(1_000_000) as u32,
            preemptible: 1,
        };
        let rc = thread_policy_set(
            mach_thread_self(),
            THREAD_TIME_CONSTRAINT_POLICY,
            &mut policy as *mut _ as *mut _,
            THREAD_TIME_CONSTRAINT_POLICY_COUNT,
        );
        if rc != KERN_SUCCESS {
            debug!("thread_policy_set failed, continuing at normal priority");
        }
    }
}

#[cfg(target_os = "macos")]
fn restore() {
    use mach2::mach_init::mach_thread_self;
    use mach2::thread_act::thread_policy_set;
    use mach2::thread_policy::{
        thread_standard_policy_data_t, THREAD_STANDARD_POLICY, THREAD_STANDARD_POLICY_COUNT,
    };

    unsafe {
        let mut policy = thread_standard_policy_data_t { no_data: 0 };
        thread_policy_set(
            mach_thread_self(),
            THREAD_STANDARD_POLICY,
            &mut policy as *mut _ as *mut _,
            THREAD_STANDARD_POLICY_COUNT,
        );
    }
}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn raise() {}

#[cfg(not(any(target_os = "linux", target_os = "windows", target_os = "macos")))]
fn restore() {}
