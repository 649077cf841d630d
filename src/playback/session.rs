//! Timed playback of a Morse symbol sequence.
//!
//! A [`PlaybackSession`] is a single-threaded state machine driven by the host
//! loop calling [`PlaybackSession::tick`]. While playing it owns exactly one
//! pending step timer; pausing or stopping drops that timer before returning,
//! so no emitter fires again until playback is resumed or restarted.

use std::time::{Duration, Instant};

use super::PlaybackParams;
use crate::emitter::EmitterSet;
use crate::morse::timing;
use crate::morse::MorseSymbol;

/// Coarse view of the session for the UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackStatus {
    Idle,
    Playing,
    Paused,
}

/// Handle for the next scheduled step. Dropping it cancels the step.
#[derive(Debug)]
struct StepTimer {
    due: Instant,
}

impl StepTimer {
    fn at(due: Instant) -> Self {
        Self { due }
    }

    fn is_due(&self, now: Instant) -> bool {
        now >= self.due
    }

    /// Schedule the following step `delay` after this one ran. An on-time
    /// step counts from its due time so small frame jitter does not
    /// accumulate; a late step counts from `now` so the next symbol keeps
    /// its full spacing.
    fn reschedule(&mut self, now: Instant, delay: Duration) {
        self.due = self.due.max(now) + delay;
    }
}

/// Sequence and position shared by the playing and paused states
#[derive(Debug)]
struct Transmission {
    sequence: Vec<MorseSymbol>,
    params: PlaybackParams,
    cursor: usize,
}

#[derive(Debug)]
enum PlaybackState {
    Idle,
    Playing {
        transmission: Transmission,
        timer: StepTimer,
    },
    Paused {
        transmission: Transmission,
    },
}

pub struct PlaybackSession {
    state: PlaybackState,
    emitters: EmitterSet,
}

impl PlaybackSession {
    pub fn new(emitters: EmitterSet) -> Self {
        Self {
            state: PlaybackState::Idle,
            emitters,
        }
    }

    pub fn status(&self) -> PlaybackStatus {
        match self.state {
            PlaybackState::Idle => PlaybackStatus::Idle,
            PlaybackState::Playing { .. } => PlaybackStatus::Playing,
            PlaybackState::Paused { .. } => PlaybackStatus::Paused,
        }
    }

    fn transmission(&self) -> Option<&Transmission> {
        match &self.state {
            PlaybackState::Idle => None,
            PlaybackState::Playing { transmission, .. } => Some(transmission),
            PlaybackState::Paused { transmission } => Some(transmission),
        }
    }

    /// Index of the next symbol to play (0 when idle)
    pub fn cursor(&self) -> usize {
        self.transmission().map_or(0, |t| t.cursor)
    }

    /// Length of the active sequence (0 when idle)
    pub fn sequence_len(&self) -> usize {
        self.transmission().map_or(0, |t| t.sequence.len())
    }

    /// When the pending step fires, if playing
    pub fn next_due(&self) -> Option<Instant> {
        match &self.state {
            PlaybackState::Playing { timer, .. } => Some(timer.due),
            _ => None,
        }
    }

    /// Start a new session. Ignored while already playing; an empty sequence
    /// leaves the session idle. Playing from pause discards the paused session.
    pub fn play(&mut self, sequence: Vec<MorseSymbol>, params: PlaybackParams, now: Instant) {
        match self.state {
            PlaybackState::Playing { .. } => {
                tracing::debug!("play ignored, already playing");
                return;
            }
            PlaybackState::Paused { .. } => {
                self.stop();
            }
            PlaybackState::Idle => {}
        }

        if sequence.is_empty() {
            tracing::debug!("play ignored, nothing to send");
            return;
        }

        tracing::debug!(
            symbols = sequence.len(),
            speed = params.speed.get(),
            "playback started"
        );
        self.emitters.prepare(&params);
        self.state = PlaybackState::Playing {
            transmission: Transmission {
                sequence,
                params,
                cursor: 0,
            },
            timer: StepTimer::at(now),
        };
    }

    /// Freeze at the current position and silence every channel
    pub fn pause(&mut self) {
        let state = std::mem::replace(&mut self.state, PlaybackState::Idle);
        self.state = match state {
            PlaybackState::Playing { transmission, .. } => {
                tracing::debug!(cursor = transmission.cursor, "playback paused");
                self.emitters.silence_all();
                PlaybackState::Paused { transmission }
            }
            other => other,
        };
    }

    /// Continue a paused session from where it stopped
    pub fn resume(&mut self, now: Instant) {
        let state = std::mem::replace(&mut self.state, PlaybackState::Idle);
        self.state = match state {
            PlaybackState::Paused { transmission } => {
                tracing::debug!(cursor = transmission.cursor, "playback resumed");
                PlaybackState::Playing {
                    transmission,
                    timer: StepTimer::at(now),
                }
            }
            other => other,
        };
    }

    /// Abandon the session and silence every channel
    pub fn stop(&mut self) {
        if matches!(self.state, PlaybackState::Idle) {
            return;
        }
        tracing::debug!("playback stopped");
        self.state = PlaybackState::Idle;
        self.emitters.silence_all();
    }

    /// Timer callback: run the pending step if it is due. At most one step
    /// runs per call.
    pub fn tick(&mut self, now: Instant) {
        let PlaybackState::Playing {
            transmission,
            timer,
        } = &mut self.state
        else {
            return;
        };

        if !timer.is_due(now) {
            return;
        }

        let Some(&symbol) = transmission.sequence.get(transmission.cursor) else {
            tracing::debug!("playback complete");
            self.state = PlaybackState::Idle;
            return;
        };

        let speed = transmission.params.speed;
        if symbol.is_signal() {
            self.emitters
                .fire_enabled(&transmission.params, timing::duration(symbol, speed), now);
        }

        let delay = timing::step_delay(symbol, speed);
        tracing::trace!(cursor = transmission.cursor, ?symbol, ?delay, "step");
        timer.reschedule(now, delay);
        transmission.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::config::PlaybackSettings;
    use crate::emitter::{Channel, Emitter};
    use crate::morse::timing::MorseSymbol::{Dash, Dot, LetterGap};
    use crate::morse::{encode, tokenize, Speed};
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    enum Event {
        Fire(Channel, Duration, Instant),
        Silence(Channel),
    }

    type Log = Rc<RefCell<Vec<Event>>>;

    struct Recorder {
        channel: Channel,
        log: Log,
    }

    impl Emitter for Recorder {
        fn fire(&mut self, duration: Duration, now: Instant) {
            self.log
                .borrow_mut()
                .push(Event::Fire(self.channel, duration, now));
        }

        fn silence(&mut self) {
            self.log.borrow_mut().push(Event::Silence(self.channel));
        }
    }

    fn recording_session() -> (PlaybackSession, Log) {
        let log: Log = Rc::new(RefCell::new(Vec::new()));
        let recorder = |channel| {
            Box::new(Recorder {
                channel,
                log: log.clone(),
            }) as Box<dyn Emitter>
        };
        let emitters = EmitterSet::new(
            recorder(Channel::Tone),
            recorder(Channel::Vibration),
            recorder(Channel::Visual),
        );
        (PlaybackSession::new(emitters), log)
    }

    /// Only the tone channel, so each signal records exactly one event
    fn tone_only() -> PlaybackParams {
        PlaybackParams {
            audio_enabled: true,
            vibration_enabled: false,
            visual_enabled: false,
            ..PlaybackSettings::default().to_params().unwrap()
        }
    }

    fn fired(log: &Log) -> Vec<Duration> {
        log.borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Fire(_, duration, _) => Some(*duration),
                Event::Silence(_) => None,
            })
            .collect()
    }

    /// Fire every pending step on time until the session goes idle
    fn run_to_completion(session: &mut PlaybackSession) -> Option<Instant> {
        let mut last = None;
        while let Some(due) = session.next_due() {
            session.tick(due);
            last = Some(due);
        }
        last
    }

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_play_does_not_fire_synchronously() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dot], tone_only(), start);

        assert_eq!(session.status(), PlaybackStatus::Playing);
        assert!(log.borrow().is_empty());
        assert_eq!(session.next_due(), Some(start));
    }

    #[test]
    fn test_dash_timing() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dash, Dot], tone_only(), start);

        session.tick(start);
        assert_eq!(*log.borrow(), vec![Event::Fire(Channel::Tone, ms(150), start)]);
        assert_eq!(session.next_due(), Some(start + ms(200)));

        // Not yet due: nothing happens
        session.tick(start + ms(199));
        assert_eq!(session.cursor(), 1);
        assert_eq!(log.borrow().len(), 1);

        session.tick(start + ms(200));
        assert_eq!(session.cursor(), 2);
        assert_eq!(
            log.borrow().last(),
            Some(&Event::Fire(Channel::Tone, ms(50), start + ms(200)))
        );
    }

    #[test]
    fn test_late_tick_keeps_symbol_spacing() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dot, Dash, Dot], tone_only(), start);

        // Host loop stalled well past the first due time
        let late = start + ms(400);
        session.tick(late);
        assert_eq!(session.next_due(), Some(late + ms(100)));

        // Frames right after the stall must not catch up on missed steps
        session.tick(late + ms(16));
        session.tick(late + ms(32));
        assert_eq!(session.cursor(), 1);

        run_to_completion(&mut session);
        let starts: Vec<Instant> = log
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Fire(_, _, at) => Some(*at),
                Event::Silence(_) => None,
            })
            .collect();
        assert_eq!(starts, vec![late, late + ms(100), late + ms(300)]);
    }

    #[test]
    fn test_natural_completion_returns_to_idle() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        let sequence = tokenize(&encode("SOS"));
        let len = sequence.len();
        session.play(sequence, tone_only(), start);

        let end = run_to_completion(&mut session).unwrap();
        assert_eq!(session.status(), PlaybackStatus::Idle);
        assert_eq!(session.cursor(), 0);
        assert_eq!(fired(&log).len(), 9);
        assert!(len > 9);

        // 9 signals of 100ms/200ms plus two 150ms letter gaps
        assert_eq!(end - start, ms(3 * 100 + 3 * 200 + 3 * 100 + 2 * 150));
        assert!(!log
            .borrow()
            .iter()
            .any(|event| matches!(event, Event::Silence(_))));
    }

    #[test]
    fn test_play_while_playing_is_ignored() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dot, LetterGap, Dash], tone_only(), start);
        session.tick(start);

        session.play(vec![Dash, Dash, Dash, Dash], tone_only(), start + ms(10));
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.sequence_len(), 3);

        run_to_completion(&mut session);
        assert_eq!(fired(&log), vec![ms(50), ms(150)]);
    }

    #[test]
    fn test_pause_freezes_and_resume_continues() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dot, LetterGap, Dash], tone_only(), start);

        session.tick(start);
        session.pause();
        assert_eq!(session.status(), PlaybackStatus::Paused);
        assert_eq!(session.cursor(), 1);
        assert_eq!(session.next_due(), None);

        // Paused: ticking well past the old due time fires nothing
        session.tick(start + ms(1000));
        assert_eq!(fired(&log), vec![ms(50)]);

        let resumed = start + ms(2000);
        session.resume(resumed);
        session.tick(resumed);
        assert_eq!(session.cursor(), 2);
        assert_eq!(fired(&log), vec![ms(50)]);

        session.tick(resumed + ms(149));
        assert_eq!(fired(&log), vec![ms(50)]);
        session.tick(resumed + ms(150));
        assert_eq!(fired(&log), vec![ms(50), ms(150)]);

        run_to_completion(&mut session);
        assert_eq!(session.status(), PlaybackStatus::Idle);
        assert_eq!(fired(&log), vec![ms(50), ms(150)]);
    }

    #[test]
    fn test_pause_silences_all_channels() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dash], tone_only(), start);
        session.tick(start);
        session.pause();

        let log = log.borrow();
        assert_eq!(
            log[1..],
            [
                Event::Silence(Channel::Tone),
                Event::Silence(Channel::Vibration),
                Event::Silence(Channel::Visual),
            ]
        );
    }

    #[test]
    fn test_pause_at_every_position_plays_each_signal_once() {
        let sequence = tokenize(&encode("PARIS 73"));
        let expected: Vec<Duration> = sequence
            .iter()
            .filter(|s| s.is_signal())
            .map(|&s| timing::duration(s, Speed::NORMAL))
            .collect();

        for k in 0..=sequence.len() {
            let (mut session, log) = recording_session();
            let mut now = Instant::now();
            session.play(sequence.clone(), tone_only(), now);

            for _ in 0..k {
                if let Some(due) = session.next_due() {
                    now = due;
                    session.tick(now);
                }
            }
            session.pause();
            session.pause();
            now += ms(500);
            session.resume(now);
            session.resume(now);
            run_to_completion(&mut session);

            assert_eq!(fired(&log), expected, "paused after {} steps", k);
        }
    }

    #[test]
    fn test_stop_resets_to_start() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        let sequence = vec![Dot, LetterGap, Dash];
        session.play(sequence.clone(), tone_only(), start);
        session.tick(start);
        session.tick(start + ms(100));

        session.stop();
        assert_eq!(session.status(), PlaybackStatus::Idle);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.next_due(), None);
        assert!(log.borrow().contains(&Event::Silence(Channel::Tone)));

        log.borrow_mut().clear();
        let restart = start + ms(1000);
        session.play(sequence, tone_only(), restart);
        session.tick(restart);
        assert_eq!(*log.borrow(), vec![Event::Fire(Channel::Tone, ms(50), restart)]);
    }

    #[test]
    fn test_redundant_controls_are_no_ops() {
        let (mut session, log) = recording_session();
        let start = Instant::now();

        session.pause();
        assert_eq!(session.status(), PlaybackStatus::Idle);
        session.resume(start);
        assert_eq!(session.status(), PlaybackStatus::Idle);
        session.stop();
        assert_eq!(session.status(), PlaybackStatus::Idle);
        session.tick(start);
        assert!(log.borrow().is_empty());

        session.play(vec![Dot], tone_only(), start);
        session.resume(start + ms(5));
        assert_eq!(session.next_due(), Some(start));
    }

    #[test]
    fn test_empty_sequence_stays_idle() {
        let (mut session, _log) = recording_session();
        session.play(Vec::new(), tone_only(), Instant::now());
        assert_eq!(session.status(), PlaybackStatus::Idle);
    }

    #[test]
    fn test_play_from_pause_restarts_with_new_sequence() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        session.play(vec![Dot, LetterGap, Dot], tone_only(), start);
        session.tick(start);
        session.pause();

        session.play(vec![Dash], tone_only(), start + ms(10));
        assert_eq!(session.status(), PlaybackStatus::Playing);
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.sequence_len(), 1);

        run_to_completion(&mut session);
        assert_eq!(fired(&log), vec![ms(50), ms(150)]);
    }

    #[test]
    fn test_only_enabled_channels_fire() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        let params = PlaybackParams {
            audio_enabled: false,
            vibration_enabled: true,
            visual_enabled: true,
            ..tone_only()
        };
        session.play(vec![Dot], params, start);
        session.tick(start);

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Fire(Channel::Vibration, ms(50), start),
                Event::Fire(Channel::Visual, ms(50), start),
            ]
        );
    }

    #[test]
    fn test_speed_scales_schedule() {
        let (mut session, log) = recording_session();
        let start = Instant::now();
        let params = PlaybackParams {
            speed: Speed::new(2.0).unwrap(),
            ..tone_only()
        };
        session.play(vec![Dash, LetterGap, Dot], params, start);

        session.tick(start);
        assert_eq!(session.next_due(), Some(start + ms(100)));
        let end = run_to_completion(&mut session).unwrap();
        assert_eq!(fired(&log), vec![ms(75), ms(25)]);
        assert_eq!(end - start, ms(100 + 75 + 50));
    }
}
