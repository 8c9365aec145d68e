use proptest::prelude::*;
use roverphys_core::{Twist, WheelState};
use roverphys_friction::{Coulomb, FrictionModel, Stribeck, Viscous};

fn models() -> Vec<Box<dyn FrictionModel>> {
    vec![Box::new(Coulomb::default()), Box::new(Viscous::default()), Box::new(Stribeck::default())]
}

proptest! {
    // A differential pair rolling without slip: wheel spin matches the
    // contact-point speed and the chassis has no lateral velocity.
    #[test]
    fn no_slip_gives_no_force(v in -3.0f64..3.0, track in 0.2f64..1.5, radius in 0.05f64..0.5) {
        let mut wheels = [WheelState::at(0.0, track / 2.0, radius), WheelState::at(0.0, -track / 2.0, radius)];
        for w in &mut wheels {
            w.normal_load = 75.0;
            w.omega = v / radius;
        }
        let twist = Twist::new(v, 0.0, 0.0);
        for m in models() {
            let forces = m.compute_forces(&wheels, &twist);
            prop_assert_eq!(forces.len(), 2);
            for f in forces {
                prop_assert!(f.force.length() < 1e-9, "{} produced {:?}", m.name(), f);
            }
        }
    }
}

#[test]
fn models_do_not_touch_wheels() {
    let mut w = WheelState::at(0.1, 0.2, 0.1);
    w.omega = 4.0;
    w.normal_load = 10.0;
    let before = w;
    for m in models() {
        let _ = m.compute_forces(std::slice::from_ref(&w), &Twist::new(1.0, 0.5, 0.2));
    }
    assert_eq!(w, before);
}
