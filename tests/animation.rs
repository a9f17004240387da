use jungle_ops::animation::{ease_in_out, lerp, Animation, AnimationPlayer, Frame, SpriteStrip};
use jungle_ops::constants::animations;
use pretty_assertions::assert_eq;
use smallvec::smallvec;
use speculoos::prelude::*;

fn two_frame(looping: bool) -> Animation {
    Animation {
        frames: smallvec![Frame::new(0, 0, 16, 16, 100.0), Frame::new(16, 0, 16, 16, 100.0)],
        looping,
        speed: 1.0,
    }
}

#[test]
fn test_unknown_animation_is_rejected() {
    let mut player = AnimationPlayer::new();
    assert_that(&player.play("missing", false)).is_false();
    assert_that(&player.current_frame()).is_none();
    assert_that(&player.is_playing(None)).is_false();
}

#[test]
fn test_looping_animation_wraps() {
    let mut player = AnimationPlayer::new();
    player.insert("blink", two_frame(true));
    player.play("blink", false);

    player.update(100.0);
    assert_eq!(player.frame_index(), 1);
    player.update(100.0);
    assert_eq!(player.frame_index(), 0);
    assert_that(&player.is_playing(Some("blink"))).is_true();
}

#[test]
fn test_non_looping_animation_holds_last_frame() {
    let mut player = AnimationPlayer::new();
    player.insert("once", two_frame(false));
    player.play("once", false);

    player.update(100.0);
    player.update(100.0);
    player.update(100.0);

    assert_that(&player.is_playing(None)).is_false();
    assert_eq!(player.frame_index(), 1);
    assert_eq!(player.current_frame(), Some(Frame::new(16, 0, 16, 16, 100.0)));
}

#[test]
fn test_replay_without_force_keeps_position() {
    let mut player = AnimationPlayer::new();
    player.insert("blink", two_frame(true));
    player.play("blink", false);
    player.update(100.0);

    player.play("blink", false);
    assert_eq!(player.frame_index(), 1);

    player.play("blink", true);
    assert_eq!(player.frame_index(), 0);
}

#[test]
fn test_speed_scales_elapsed_time() {
    let mut player = AnimationPlayer::new();
    player.insert("blink", two_frame(true));
    player.play("blink", false);

    assert_that(&player.set_speed(0.0)).is_false();
    assert_that(&player.set_speed(2.0)).is_true();
    player.update(50.0);
    assert_eq!(player.frame_index(), 1);
}

#[test]
fn test_progress_spans_whole_strip() {
    let mut player = AnimationPlayer::new();
    player.insert("blink", two_frame(true));
    player.play("blink", false);
    player.update(50.0);

    assert_that(&player.progress()).is_close_to(0.25, 1e-5);
    player.stop();
    assert_eq!(player.progress(), 0.0);
    assert_that(&player.current_name()).is_none();
}

#[test]
fn test_sprite_strip_wraps_rows() {
    let mut player = AnimationPlayer::new();
    player.sprite_strip(
        "smoke",
        SpriteStrip {
            start_x: 10,
            start_y: 20,
            frame_width: 8,
            frame_height: 8,
            frame_count: 5,
            frames_per_row: 3,
        },
        50.0,
        true,
        1.0,
    );

    let frames = &player.get("smoke").unwrap().frames;
    assert_eq!(frames.len(), 5);
    assert_eq!((frames[2].x, frames[2].y), (26, 20));
    assert_eq!((frames[3].x, frames[3].y), (10, 28));
}

#[test]
fn test_defaults_are_registered() {
    let player = AnimationPlayer::with_defaults();
    for name in [
        animations::PLAYER_IDLE,
        animations::PLAYER_WALK,
        animations::PLAYER_ATTACK,
        animations::PLAYER_DEATH,
        animations::ENEMY_IDLE,
        animations::ENEMY_WALK,
        animations::ENEMY_ATTACK,
        animations::ENEMY_DEATH,
        animations::EXPLOSION,
    ] {
        assert_that(&player.has(name)).is_true();
    }
    assert_that(&player.get(animations::PLAYER_ATTACK).unwrap().looping).is_false();
    assert_eq!(player.get(animations::EXPLOSION).unwrap().frames.len(), 5);
}

#[test]
fn test_easing_endpoints() {
    assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
    assert_eq!(ease_in_out(0.0), 0.0);
    assert_eq!(ease_in_out(1.0), 1.0);
    assert_that(&ease_in_out(0.5)).is_close_to(0.5, 1e-5);
}

#[test]
fn test_replacing_playing_animation_restarts_it() {
    let mut player = AnimationPlayer::new();
    player.insert("march", two_frame(true));
    player.play("march", false);
    player.update(100.0);
    assert_eq!(player.frame_index(), 1);

    player.insert(
        "march",
        Animation {
            frames: smallvec![Frame::new(0, 0, 16, 16, 50.0)],
            looping: true,
            speed: 1.0,
        },
    );
    assert_eq!(player.frame_index(), 0);

    player.update(10.0);
    assert_eq!(player.current_frame(), Some(Frame::new(0, 0, 16, 16, 50.0)));
    assert_that(&player.progress()).is_close_to(0.2, 1e-4);
}
