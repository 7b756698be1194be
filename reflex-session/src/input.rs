/// Source of discrete press events plus the session-level cancel and quit
/// signals.
///
/// Events arrive out of band; `pump` drains them into a latch holding the
/// first qualifying press since the last reset. Later presses are dropped
/// until the latch is reset again, which keeps key repeat and near
/// simultaneous button bursts from resolving a trial twice.
pub trait InputSource {
    /// Drains pending events without blocking. Called once per loop pass.
    fn pump(&mut self);

    /// Timestamp of the first qualifying press since the last latch reset.
    fn latched_press(&self) -> Option<u64>;

    /// Clears the press latch. Called exactly at trial begin.
    fn reset_latch(&mut self);

    /// Clears the latch and the cancel signal at session start. The quit
    /// signal survives; it ends the application, not just the run.
    fn reset_session(&mut self);

    /// The cancel key was pressed; the session ends with `Aborted`.
    fn cancel_requested(&self) -> bool;

    /// The window was closed; the session ends with `QuitRequested`.
    fn quit_requested(&self) -> bool;
}
