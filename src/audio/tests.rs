use super::sink::{decode, probe_duration};
use super::*;
use std::time::Duration;

/// A minimal PCM WAV: 8 kHz, mono, 16-bit.
fn wav(seconds: u32) -> Vec<u8> {
    let rate = 8000u32;
    let data_len = rate * 2 * seconds;
    let mut out = Vec::new();
    out.extend_from_slice(b"RIFF");
    out.extend_from_slice(&(36 + data_len).to_le_bytes());
    out.extend_from_slice(b"WAVEfmt ");
    out.extend_from_slice(&16u32.to_le_bytes());
    out.extend_from_slice(&1u16.to_le_bytes()); // PCM
    out.extend_from_slice(&1u16.to_le_bytes()); // mono
    out.extend_from_slice(&rate.to_le_bytes());
    out.extend_from_slice(&(rate * 2).to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&16u16.to_le_bytes());
    out.extend_from_slice(b"data");
    out.extend_from_slice(&data_len.to_le_bytes());
    out.resize(out.len() + data_len as usize, 0);
    out
}

#[test]
fn duration_is_probed_from_container_headers() {
    let d = probe_duration(&wav(2)).expect("wav duration");
    assert!(d >= Duration::from_millis(1900) && d <= Duration::from_millis(2100));
}

#[test]
fn garbage_has_no_duration_and_does_not_decode() {
    let junk = b"<html>404 not found</html>".to_vec();
    assert!(probe_duration(&junk).is_none());
    assert!(matches!(
        decode(junk),
        Err(crate::error::PlaybackError::Decode(_))
    ));
}

#[test]
fn playback_info_reports_unknown_duration_as_nan() {
    let mut info = PlaybackInfo::default();
    assert!(info.duration_secs().is_nan());
    assert_eq!(info.position_secs(), 0.0);

    info.duration = Some(Duration::from_secs(90));
    info.position = Duration::from_millis(1500);
    assert_eq!(info.duration_secs(), 90.0);
    assert_eq!(info.position_secs(), 1.5);
}
