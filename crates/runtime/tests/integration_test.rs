use combat_core::{
    AbilityCatalog, AbilityDefinition, AbilityEffect, AbilityTags, ActorId, ActorTemplate,
    CombatConfig, CombatSession, DamageSchool, EventKind, ExternalCommand, PhaseSpec, Role,
    Roster, SessionError, SessionState, TargetFilter, TickReport,
};
use combat_runtime::{AbilitySelector, Runtime, RuntimeConfig, RuntimeError, RuntimeHandle};

struct Party {
    tank: ActorId,
    healer: ActorId,
    dps: [ActorId; 3],
    boss: ActorId,
    ogre: ActorId,
}

fn catalog() -> AbilityCatalog {
    [
        AbilityDefinition::new("challenging_shout", TargetFilter::Area)
            .with_tags(AbilityTags::TAUNT)
            .with_cooldown(4)
            .with_effect(AbilityEffect::Taunt { duration: 3 }),
        AbilityDefinition::new("smite", TargetFilter::Enemy)
            .with_tags(AbilityTags::DAMAGE)
            .with_effect(AbilityEffect::Damage {
                amount: 20.0,
                school: DamageSchool::Magic,
            }),
        AbilityDefinition::new("mend", TargetFilter::Ally)
            .with_tags(AbilityTags::HEAL)
            .with_cost(10.0)
            .with_effect(AbilityEffect::Heal { amount: 40.0 }),
        AbilityDefinition::new("strike", TargetFilter::Enemy)
            .with_tags(AbilityTags::DAMAGE)
            .with_effect(AbilityEffect::Damage {
                amount: 25.0,
                school: DamageSchool::Physical,
            }),
        AbilityDefinition::new("crush", TargetFilter::Enemy)
            .with_tags(AbilityTags::DAMAGE)
            .with_effect(AbilityEffect::Damage {
                amount: 130.0,
                school: DamageSchool::Physical,
            }),
        AbilityDefinition::new("enrage", TargetFilter::SelfOnly)
            .phase_only()
            .with_effect(AbilityEffect::RestoreResource { amount: 50.0 }),
    ]
    .into_iter()
    .collect()
}

/// One tank, one healer and three damage dealers against an ogre and a boss.
///
/// Only the healer is AI-controlled; everyone else acts on external commands
/// so the scenario stays scripted.
fn encounter() -> (CombatSession, Party) {
    let mut roster = Roster::new();
    let tank = roster.spawn(
        &ActorTemplate::new("Warden", Role::Tank)
            .with_attribute("stamina", 20.0)
            .with_ability("challenging_shout")
            .manual(),
    );
    let healer = roster.spawn(
        &ActorTemplate::new("Cleric", Role::Healer)
            .with_attribute("stamina", 10.0)
            .with_attribute("intellect", 10.0)
            .with_ability("smite")
            .with_ability("mend"),
    );
    let dps = [0, 1, 2].map(|n| {
        roster.spawn(
            &ActorTemplate::new(format!("Blade {n}"), Role::Damage)
                .with_attribute("stamina", 10.0)
                .with_ability("strike")
                .manual(),
        )
    });
    let boss = roster.spawn(
        &ActorTemplate::new("Warlord", Role::Hostile)
            .with_attribute("stamina", 30.0)
            .as_boss()
            .manual(),
    );
    let ogre = roster.spawn(
        &ActorTemplate::new("Ogre", Role::Hostile)
            .with_attribute("stamina", 10.0)
            .with_ability("crush")
            .manual(),
    );

    let session = CombatSession::new(roster, catalog(), CombatConfig::default())
        .with_seed(7)
        .with_boss(vec![PhaseSpec::new(0.5, Some("enrage".into()))])
        .expect("valid phases");

    (
        session,
        Party {
            tank,
            healer,
            dps,
            boss,
            ogre,
        },
    )
}

async fn command(handle: &RuntimeHandle, actor: ActorId, ability: &str, target: Option<ActorId>) {
    handle
        .queue_command(ExternalCommand::UseAbility {
            actor,
            ability: ability.into(),
            target,
        })
        .await
        .expect("command queued");
}

fn count_events(reports: &[TickReport], matches: impl Fn(&EventKind) -> bool) -> usize {
    reports
        .iter()
        .flat_map(|report| report.events.iter())
        .filter(|event| matches(&event.kind))
        .count()
}

fn health_of(session: &CombatSession, actor: ActorId) -> f64 {
    session
        .roster()
        .get(actor)
        .map(|a| a.health.current)
        .unwrap_or_default()
}

/// End-to-end encounter driven through the runtime.
///
/// 1. Damage dealers and the healer pull both hostiles off the tank
/// 2. The tank taunts and both hostiles turn to it
/// 3. The ogre drops the tank to 35% and the healer switches to healing
/// 4. The boss crosses 50% and fires its phase ability exactly once
/// 5. The healer finishes the fight alone
#[tokio::test]
async fn test_party_encounter_scenario() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();

    let (session, party) = encounter();
    let runtime = Runtime::builder()
        .session(session)
        .decider(AbilitySelector::new())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    let mut reports_rx = handle.subscribe();

    handle.start().await.expect("encounter starts");

    // ================================================================
    // Tick 1: threat lands on the damage dealers and the healer
    // ================================================================
    command(&handle, party.dps[0], "strike", Some(party.ogre)).await;
    command(&handle, party.dps[1], "strike", Some(party.boss)).await;
    let tick1 = handle.step().await.expect("tick 1");

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.current_target(party.ogre), Some(party.dps[0]));
    assert_eq!(snapshot.current_target(party.boss), Some(party.dps[1]));
    // healthy party: the healer attacks
    let smites = count_events(std::slice::from_ref(&tick1), |kind| {
        matches!(kind, EventKind::DamageDealt { ability, .. } if ability.as_str() == "smite")
    });
    assert_eq!(smites, 1);

    // ================================================================
    // Tick 2: area taunt pulls both hostiles onto the tank
    // ================================================================
    command(&handle, party.tank, "challenging_shout", None).await;
    let tick2 = handle.step().await.expect("tick 2");

    let taunts = count_events(std::slice::from_ref(&tick2), |kind| {
        matches!(kind, EventKind::Taunted { .. })
    });
    assert_eq!(taunts, 2);
    let snapshot = handle.snapshot().await.expect("snapshot");
    assert_eq!(snapshot.current_target(party.ogre), Some(party.tank));
    assert_eq!(snapshot.current_target(party.boss), Some(party.tank));

    // ================================================================
    // Tick 3: tank drops to 35%, the healer answers with a heal
    // ================================================================
    command(&handle, party.ogre, "crush", Some(party.tank)).await;
    let tick3 = handle.step().await.expect("tick 3");

    let crushed = tick3.events.iter().any(|event| {
        event.target == Some(party.tank)
            && matches!(&event.kind, EventKind::DamageDealt { amount, .. } if (*amount - 130.0).abs() < 1e-9)
    });
    assert!(crushed, "tank should take the full crush");
    let mend = tick3
        .events
        .iter()
        .find(|event| {
            matches!(&event.kind, EventKind::HealingApplied { ability, .. } if ability.as_str() == "mend")
        })
        .expect("healer should heal the tank");
    assert_eq!(mend.source, Some(party.healer));
    assert_eq!(mend.target, Some(party.tank));

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert!(health_of(&snapshot, party.tank) > 70.0);

    // ================================================================
    // Ticks 4-5: boss crosses 50%, phase ability fires once
    // ================================================================
    let mut burst = Vec::new();
    for _ in 0..2 {
        for blade in party.dps {
            command(&handle, blade, "strike", Some(party.boss)).await;
        }
        burst.push(handle.step().await.expect("burst tick"));
    }

    let snapshot = handle.snapshot().await.expect("snapshot");
    assert!(snapshot.roster().is_alive(party.boss));
    assert!(health_of(&snapshot, party.boss) < 150.0);
    let transitions = count_events(&burst, |kind| matches!(kind, EventKind::PhaseTransition { .. }));
    assert_eq!(transitions, 1);
    let enrages = count_events(&burst, |kind| {
        matches!(kind, EventKind::ActionCommitted { ability } if ability.as_str() == "enrage")
    });
    assert_eq!(enrages, 1);

    // ================================================================
    // The healer finishes the fight
    // ================================================================
    let summary = runtime.run_to_end().await.expect("encounter resolves");
    assert_eq!(summary.outcome, SessionState::Victory);
    assert_eq!(summary.survivors.len(), 5);

    // every tick was broadcast, start report included
    let mut broadcast = Vec::new();
    while let Ok(report) = reports_rx.try_recv() {
        broadcast.push(report);
    }
    assert_eq!(broadcast.first().map(|r| r.tick.0), Some(0));
    assert_eq!(broadcast.last().map(|r| r.state), Some(SessionState::Victory));
    let enrages = count_events(&broadcast, |kind| {
        matches!(kind, EventKind::ActionCommitted { ability } if ability.as_str() == "enrage")
    });
    assert_eq!(enrages, 1);

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_healer_prefers_damage_until_party_is_hurt() {
    let (session, party) = encounter();
    let selector = AbilitySelector::new();

    let healthy = selector
        .select(&session, party.healer)
        .expect("healthy healer has a candidate");
    assert_eq!(healthy.ability.as_str(), "smite");

    let runtime = Runtime::builder()
        .session(session)
        .decider(selector.clone())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();
    handle.start().await.expect("start");
    command(&handle, party.ogre, "crush", Some(party.tank)).await;
    // the ogre acts before the party, so the healer already sees the damage
    let report = handle.step().await.expect("step");
    assert!(report.events.iter().any(|event| {
        event.source == Some(party.healer)
            && matches!(&event.kind, EventKind::HealingApplied { ability, .. } if ability.as_str() == "mend")
    }));

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_session_errors_surface_through_handle() {
    let (session, party) = encounter();
    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            max_ticks: 3,
            ..RuntimeConfig::default()
        })
        .session(session)
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    let error = handle.step().await.expect_err("not started");
    assert!(matches!(error, RuntimeError::Session(SessionError::NotStarted)));

    let error = handle
        .queue_command(ExternalCommand::Idle { actor: ActorId(99) })
        .await
        .expect_err("unknown actor");
    assert!(matches!(
        error,
        RuntimeError::Session(SessionError::UnknownActor(ActorId(99)))
    ));

    handle.start().await.expect("start");
    let error = handle.start().await.expect_err("second start");
    assert!(matches!(error, RuntimeError::Session(SessionError::AlreadyStarted)));

    // the tick cap stops a fight that cannot end
    handle
        .queue_command(ExternalCommand::Idle { actor: party.healer })
        .await
        .expect("idle queued");
    let summary = runtime.run_to_end().await.expect("capped run");
    assert_eq!(summary.duration_ticks, 3);
    assert_eq!(summary.outcome, SessionState::Active);

    drop(handle);
    runtime.shutdown().await.expect("shutdown");
}

#[tokio::test]
async fn test_builder_requires_session() {
    let result = Runtime::builder().build().await;
    assert!(matches!(result, Err(RuntimeError::MissingSession)));
}
