//! Preset Tests
//!
//! Snapshot, serialization and application of presets across chains.

use pretty_assertions::assert_eq;

use riffbox::dsp::EffectKind;
use riffbox::engine::{default_chain, AudioEngine, EngineConfig};
use riffbox::presets::{apply_preset, factory_presets, find_factory, snapshot_chain, Preset};

#[test]
fn test_snapshot_apply_reproduces_values() {
    let mut source = default_chain(44100);
    source.get_mut(0).unwrap().set_param("gain", 12.5).unwrap();
    source.get_mut(2).unwrap().set_param("depth", 0.011).unwrap();
    source.get_mut(4).unwrap().set_param("room_size", 1.3).unwrap();
    source.set_enabled(1, false).unwrap();
    let snapshot = snapshot_chain(&source, "Mine");

    let mut target = default_chain(44100);
    let applied = apply_preset(&mut target, &snapshot);
    // enabled flag plus table parameters for each of the five effects
    assert_eq!(applied, 4 + 5 + 4 + 4 + 4);
    assert_eq!(snapshot_chain(&target, "Mine"), snapshot);
}

#[test]
fn test_json_round_trip_then_apply() {
    let chain = default_chain(44100);
    let preset = snapshot_chain(&chain, "Saved");
    let text = serde_json::to_string(&preset).unwrap();
    let loaded: Preset = serde_json::from_str(&text).unwrap();
    assert_eq!(loaded, preset);
    assert!(!loaded.factory);
}

#[test]
fn test_hand_written_preset_is_lenient() {
    let preset: Preset = serde_json::from_str(
        r#"{
            "name": "Sketch",
            "effects": {
                "Delay": {"enabled": true, "delay_ms": 250, "wow": 3, "mix": "lots"},
                "Phaser": {"enabled": true}
            }
        }"#,
    )
    .unwrap();

    let mut chain = default_chain(44100);
    let applied = apply_preset(&mut chain, &preset);
    assert_eq!(applied, 2);

    let delay = chain.get(3).unwrap();
    assert_eq!(delay.get_param("delay_ms"), Some(250.0));
    assert_eq!(delay.get_param("mix"), Some(0.5));
}

#[test]
fn test_factory_presets_cover_every_effect() {
    for preset in factory_presets() {
        assert!(preset.factory);
        for kind in EffectKind::ALL {
            assert!(
                preset.settings(kind).is_some(),
                "{} is missing {}",
                preset.name,
                kind
            );
        }
    }
}

#[test]
fn test_preset_through_controller() {
    let (mut engine, controller) = AudioEngine::from_config(&EngineConfig::default());
    controller.apply_preset(find_factory("hip-hop").unwrap()).unwrap();

    let mut block = vec![0.0; 128];
    engine.process_block(&mut block);

    let chain = engine.chain();
    assert!(!chain.get(0).unwrap().is_enabled());
    assert!(!chain.get(1).unwrap().is_enabled());
    assert_eq!(chain.get(2).unwrap().get_param("rate"), Some(0.8));
    assert_eq!(chain.get(3).unwrap().get_param("delay_ms"), Some(450.0));
}
