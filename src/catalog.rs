use std::fs;
use std::path::Path;

use schema::{
    CardDefinition, CardEffect, CardKind, CounterKind, DevotionSurge, EnemyDefinition, EnemyMove,
    MinionDefinition, MoveAction, MovePhase, MovePool, StatusKind,
};

use crate::errors::{CatalogError, CatalogResult};

/// The Lightbearer's starting deck: ten card templates, duplicates included.
pub fn starter_deck() -> Vec<CardDefinition> {
    let mut deck = Vec::new();
    for _ in 0..4 {
        deck.push(card_ashen_blade());
    }
    for _ in 0..3 {
        deck.push(card_bulwark());
    }
    deck.push(card_consecrate());
    deck.push(card_grim_wager());
    deck.push(card_devout_offering());
    deck
}

pub fn card_ashen_blade() -> CardDefinition {
    CardDefinition {
        id: "ashen_blade".to_string(),
        name: "Ashen Blade".to_string(),
        kind: CardKind::Attack,
        cost: 1,
        effects: vec![CardEffect::Strike { amount: 6 }],
        exhaust: false,
        devotion_surge: Some(DevotionSurge {
            cost: 2,
            effects: vec![CardEffect::Strike { amount: 10 }],
        }),
    }
}

pub fn card_bulwark() -> CardDefinition {
    CardDefinition {
        id: "bulwark".to_string(),
        name: "Bulwark".to_string(),
        kind: CardKind::Skill,
        cost: 1,
        effects: vec![CardEffect::Guard { amount: 5 }],
        exhaust: false,
        devotion_surge: None,
    }
}

pub fn card_consecrate() -> CardDefinition {
    CardDefinition {
        id: "consecrate".to_string(),
        name: "Consecrate".to_string(),
        kind: CardKind::Skill,
        cost: 1,
        effects: vec![CardEffect::Afflict {
            status: StatusKind::Sundered,
            magnitude: 1,
            duration: Some(2),
            all: false,
        }],
        exhaust: false,
        devotion_surge: None,
    }
}

pub fn card_grim_wager() -> CardDefinition {
    CardDefinition {
        id: "grim_wager".to_string(),
        name: "Grim Wager".to_string(),
        kind: CardKind::Skill,
        cost: 0,
        effects: vec![
            CardEffect::GainCounter {
                counter: CounterKind::Luck,
                amount: 3,
            },
            CardEffect::Draw { count: 1 },
        ],
        exhaust: false,
        devotion_surge: None,
    }
}

pub fn card_devout_offering() -> CardDefinition {
    CardDefinition {
        id: "devout_offering".to_string(),
        name: "Devout Offering".to_string(),
        kind: CardKind::Skill,
        cost: 1,
        effects: vec![
            CardEffect::PayHp { amount: 2 },
            CardEffect::GainCounter {
                counter: CounterKind::Devotion,
                amount: 3,
            },
        ],
        exhaust: false,
        devotion_surge: None,
    }
}

pub fn card_purifying_rite() -> CardDefinition {
    CardDefinition {
        id: "purifying_rite".to_string(),
        name: "Purifying Rite".to_string(),
        kind: CardKind::Skill,
        cost: 1,
        effects: vec![
            CardEffect::Cleanse {
                status: StatusKind::Weakened,
            },
            CardEffect::Mend { amount: 3 },
        ],
        exhaust: false,
        devotion_surge: None,
    }
}

pub fn card_radiant_vow() -> CardDefinition {
    CardDefinition {
        id: "radiant_vow".to_string(),
        name: "Radiant Vow".to_string(),
        kind: CardKind::Power,
        cost: 1,
        effects: vec![CardEffect::GainCounter {
            counter: CounterKind::Radiance,
            amount: 4,
        }],
        exhaust: true,
        devotion_surge: None,
    }
}

/// The built-in enemy catalog. A data layer can extend or replace this with
/// RON-authored definitions via the `load_*` functions below.
pub fn enemy_catalog() -> Vec<EnemyDefinition> {
    vec![
        greater_demon(),
        gravetide_acolyte(),
        hollow_knight(),
        bone_warden(),
    ]
}

/// Minions any of the catalog enemies may summon. Register these before
/// starting a combat that includes their summoners.
pub fn minion_catalog() -> Vec<MinionDefinition> {
    vec![
        MinionDefinition {
            id: "imp".to_string(),
            name: "Imp".to_string(),
            max_hp: 15,
            attack_damage: 4,
        },
        MinionDefinition {
            id: "drowned_one".to_string(),
            name: "Drowned One".to_string(),
            max_hp: 12,
            attack_damage: 5,
        },
        MinionDefinition {
            id: "restless_shade".to_string(),
            name: "Restless Shade".to_string(),
            max_hp: 10,
            attack_damage: 6,
        },
    ]
}

pub fn greater_demon() -> EnemyDefinition {
    EnemyDefinition {
        id: "greater_demon".to_string(),
        name: "Greater Demon".to_string(),
        max_hp: 120,
        pool: MovePool::Flat(vec![
            EnemyMove {
                id: "rake".to_string(),
                name: "Rake".to_string(),
                action: MoveAction::Attack {
                    damage: 12,
                    lifesteal: None,
                    self_damage: None,
                },
                hp_threshold: None,
                once_only: false,
                weight: 3,
            },
            EnemyMove {
                id: "soul_harvest".to_string(),
                name: "Soul Harvest".to_string(),
                action: MoveAction::Attack {
                    damage: 10,
                    lifesteal: Some(18),
                    self_damage: None,
                },
                hp_threshold: None,
                once_only: false,
                weight: 2,
            },
            EnemyMove {
                id: "consume_minion".to_string(),
                name: "Consume Minion".to_string(),
                action: MoveAction::Heal {
                    amount: 20,
                    consumes: Some("imp".to_string()),
                },
                hp_threshold: Some(0.8),
                once_only: false,
                weight: 2,
            },
            EnemyMove {
                id: "summon_imps".to_string(),
                name: "Summon Imps".to_string(),
                action: MoveAction::Summon {
                    minions: vec!["imp".to_string(), "imp".to_string()],
                    resurrect: false,
                },
                hp_threshold: None,
                once_only: false,
                weight: 2,
            },
            EnemyMove {
                id: "infernal_command".to_string(),
                name: "Infernal Command".to_string(),
                action: MoveAction::Command,
                hp_threshold: None,
                once_only: false,
                weight: 1,
            },
            EnemyMove {
                id: "dread_howl".to_string(),
                name: "Dread Howl".to_string(),
                action: MoveAction::Debuff {
                    status: StatusKind::Weakened,
                    magnitude: 2,
                    duration: Some(2),
                },
                hp_threshold: None,
                once_only: false,
                weight: 1,
            },
        ]),
        is_elite: false,
        is_boss: true,
    }
}

pub fn gravetide_acolyte() -> EnemyDefinition {
    EnemyDefinition {
        id: "gravetide_acolyte".to_string(),
        name: "Gravetide Acolyte".to_string(),
        max_hp: 48,
        pool: MovePool::Flat(vec![
            EnemyMove {
                id: "call_the_drowned".to_string(),
                name: "Call the Drowned".to_string(),
                action: MoveAction::Spawn {
                    minion: "drowned_one".to_string(),
                },
                hp_threshold: None,
                once_only: false,
                weight: 2,
            },
            EnemyMove {
                id: "tide_lash".to_string(),
                name: "Tide Lash".to_string(),
                action: MoveAction::Attack {
                    damage: 7,
                    lifesteal: None,
                    self_damage: None,
                },
                hp_threshold: None,
                once_only: false,
                weight: 3,
            },
            EnemyMove {
                id: "barnacle_shell".to_string(),
                name: "Barnacle Shell".to_string(),
                action: MoveAction::Defend { block: 8 },
                hp_threshold: None,
                once_only: false,
                weight: 2,
            },
        ]),
        is_elite: false,
        is_boss: false,
    }
}

pub fn hollow_knight() -> EnemyDefinition {
    EnemyDefinition {
        id: "hollow_knight".to_string(),
        name: "Hollow Knight".to_string(),
        max_hp: 80,
        pool: MovePool::Flat(vec![
            EnemyMove {
                id: "skewer".to_string(),
                name: "Skewer".to_string(),
                action: MoveAction::Attack {
                    damage: 9,
                    lifesteal: None,
                    self_damage: None,
                },
                hp_threshold: None,
                once_only: false,
                weight: 3,
            },
            EnemyMove {
                id: "raise_shield".to_string(),
                name: "Raise Shield".to_string(),
                action: MoveAction::Defend { block: 10 },
                hp_threshold: None,
                once_only: false,
                weight: 2,
            },
            EnemyMove {
                id: "winding_blow".to_string(),
                name: "Winding Blow".to_string(),
                action: MoveAction::Charging {
                    turns: 1,
                    unleash: Box::new(MoveAction::MultiAttack { damage: 6, times: 2 }),
                },
                hp_threshold: None,
                once_only: false,
                weight: 2,
            },
            EnemyMove {
                id: "execution".to_string(),
                name: "Execution".to_string(),
                action: MoveAction::Attack {
                    damage: 25,
                    lifesteal: None,
                    self_damage: Some(5),
                },
                hp_threshold: Some(0.3),
                once_only: true,
                weight: 6,
            },
        ]),
        is_elite: true,
        is_boss: false,
    }
}

pub fn bone_warden() -> EnemyDefinition {
    EnemyDefinition {
        id: "bone_warden".to_string(),
        name: "Bone Warden".to_string(),
        max_hp: 160,
        pool: MovePool::Phased {
            phases: vec![
                MovePhase {
                    name: "Vigil".to_string(),
                    moves: vec![
                        EnemyMove {
                            id: "crypt_slam".to_string(),
                            name: "Crypt Slam".to_string(),
                            action: MoveAction::Attack {
                                damage: 10,
                                lifesteal: None,
                                self_damage: None,
                            },
                            hp_threshold: None,
                            once_only: false,
                            weight: 3,
                        },
                        EnemyMove {
                            id: "wardens_stance".to_string(),
                            name: "Warden's Stance".to_string(),
                            action: MoveAction::Defend { block: 12 },
                            hp_threshold: None,
                            once_only: false,
                            weight: 2,
                        },
                    ],
                },
                MovePhase {
                    name: "Wrath".to_string(),
                    moves: vec![
                        EnemyMove {
                            id: "bone_storm".to_string(),
                            name: "Bone Storm".to_string(),
                            action: MoveAction::MultiAttack { damage: 4, times: 3 },
                            hp_threshold: None,
                            once_only: false,
                            weight: 3,
                        },
                        EnemyMove {
                            id: "sharpen_splinters".to_string(),
                            name: "Sharpen Splinters".to_string(),
                            action: MoveAction::Buff {
                                status: StatusKind::Might,
                                magnitude: 3,
                                duration: None,
                            },
                            hp_threshold: None,
                            once_only: false,
                            weight: 2,
                        },
                        EnemyMove {
                            id: "wardens_duty".to_string(),
                            name: "Warden's Duty".to_string(),
                            action: MoveAction::Heal {
                                amount: 15,
                                consumes: None,
                            },
                            hp_threshold: Some(0.5),
                            once_only: false,
                            weight: 1,
                        },
                    ],
                },
                MovePhase {
                    name: "Desperation".to_string(),
                    moves: vec![
                        EnemyMove {
                            id: "last_rites".to_string(),
                            name: "Last Rites".to_string(),
                            action: MoveAction::Charging {
                                turns: 2,
                                unleash: Box::new(MoveAction::Attack {
                                    damage: 30,
                                    lifesteal: None,
                                    self_damage: None,
                                }),
                            },
                            hp_threshold: None,
                            once_only: true,
                            weight: 4,
                        },
                        EnemyMove {
                            id: "grave_bloom".to_string(),
                            name: "Grave Bloom".to_string(),
                            action: MoveAction::Summon {
                                minions: vec![
                                    "restless_shade".to_string(),
                                    "restless_shade".to_string(),
                                ],
                                resurrect: false,
                            },
                            hp_threshold: None,
                            once_only: false,
                            weight: 2,
                        },
                        EnemyMove {
                            id: "bone_storm".to_string(),
                            name: "Bone Storm".to_string(),
                            action: MoveAction::MultiAttack { damage: 4, times: 3 },
                            hp_threshold: None,
                            once_only: false,
                            weight: 2,
                        },
                    ],
                },
            ],
            thresholds: vec![0.66, 0.33],
        },
        is_elite: false,
        is_boss: true,
    }
}

/// Find a catalog enemy by id.
pub fn enemy_definition(id: &str) -> CatalogResult<EnemyDefinition> {
    enemy_catalog()
        .into_iter()
        .find(|d| d.id == id)
        .ok_or_else(|| CatalogError::DefinitionNotFound(id.to_string()))
}

// --- RON loading -----------------------------------------------------------
// Catalogs are also authorable as RON documents, the same shapes as above.

pub fn load_enemies_from_str(source: &str) -> CatalogResult<Vec<EnemyDefinition>> {
    Ok(ron::from_str(source)?)
}

pub fn load_minions_from_str(source: &str) -> CatalogResult<Vec<MinionDefinition>> {
    Ok(ron::from_str(source)?)
}

pub fn load_cards_from_str(source: &str) -> CatalogResult<Vec<CardDefinition>> {
    Ok(ron::from_str(source)?)
}

pub fn load_enemies_file(path: &Path) -> CatalogResult<Vec<EnemyDefinition>> {
    let content = fs::read_to_string(path)?;
    load_enemies_from_str(&content)
}

pub fn load_minions_file(path: &Path) -> CatalogResult<Vec<MinionDefinition>> {
    let content = fs::read_to_string(path)?;
    load_minions_from_str(&content)
}

pub fn load_cards_file(path: &Path) -> CatalogResult<Vec<CardDefinition>> {
    let content = fs::read_to_string(path)?;
    load_cards_from_str(&content)
}
