/// Screen state machine shared by every game.
///
/// `advance` is total: events that make no sense for the current screen leave
/// it unchanged. Callers compare the old and new screen to decide when to
/// start a new game or load the next level.

/// Frames a level-transition banner stays up.
pub const TRANSITION_FRAMES: u32 = 180;

#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    Title,
    Playing,
    Paused,
    LevelTransition { frames_left: u32 },
    GameOver,
    Victory,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FlowEvent {
    /// Enter (or Space, where a game allows it).
    Confirm,
    /// Leave an end screen for the title.
    Dismiss,
    Pause,
    PlayerDown,
    StageCleared { final_stage: bool },
    Tick,
}

pub fn advance(screen: &Screen, event: FlowEvent) -> Screen {
    use FlowEvent as E;
    use Screen as S;

    match (screen, event) {
        (S::Title | S::GameOver | S::Victory, E::Confirm) => S::Playing,
        (S::GameOver | S::Victory, E::Dismiss) => S::Title,

        (S::Playing, E::Pause) => S::Paused,
        (S::Paused, E::Pause | E::Confirm) => S::Playing,

        (S::Playing, E::PlayerDown) => S::GameOver,
        (S::Playing, E::StageCleared { final_stage: true }) => S::Victory,
        (S::Playing, E::StageCleared { final_stage: false }) => S::LevelTransition {
            frames_left: TRANSITION_FRAMES,
        },

        (S::LevelTransition { frames_left }, E::Tick) if *frames_left > 1 => {
            S::LevelTransition {
                frames_left: frames_left - 1,
            }
        }
        (S::LevelTransition { .. }, E::Tick) => S::Playing,

        (current, _) => current.clone(),
    }
}

/// `true` when moving from `before` to `after` begins a fresh run.
pub fn starts_new_run(before: &Screen, after: &Screen) -> bool {
    matches!(before, Screen::Title | Screen::GameOver | Screen::Victory)
        && *after == Screen::Playing
}

/// `true` when a level-transition countdown just expired.
pub fn finished_transition(before: &Screen, after: &Screen) -> bool {
    matches!(before, Screen::LevelTransition { .. }) && *after == Screen::Playing
}
