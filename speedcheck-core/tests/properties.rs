//! Property tests for the filter and integrator invariants

use proptest::prelude::*;

use speedcheck_core::{
    time::elapsed_secs, GravityEstimator, MotionBranch, Vector3, VelocityIntegrator,
};

fn vector(range: f32) -> impl Strategy<Value = Vector3> {
    (-range..range, -range..range, -range..range).prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

proptest! {
    /// A constant input is approached monotonically on every axis
    #[test]
    fn gravity_converges_to_constant_input(
        target in vector(20.0),
        alpha in 0.05f32..0.95,
        steps in 1usize..200,
    ) {
        let mut filter = GravityEstimator::new(alpha);
        let mut previous_error = target.magnitude();

        for _ in 0..steps {
            let error = (filter.update(target) - target).magnitude();
            prop_assert!(error <= previous_error + 1e-4);
            previous_error = error;
        }
        prop_assert_eq!(filter.sample_count(), steps as u64);
    }

    /// The estimate stays inside the bounding box of its inputs
    #[test]
    fn gravity_estimate_is_bounded_by_inputs(
        samples in prop::collection::vec(vector(50.0), 1..100),
    ) {
        let mut filter = GravityEstimator::default();
        let bound = samples.iter().map(|s| s.x.abs().max(s.y.abs()).max(s.z.abs())).fold(0.0f32, f32::max);

        for sample in &samples {
            let estimate = filter.update(*sample);
            prop_assert!(estimate.x.abs() <= bound + 1e-3);
            prop_assert!(estimate.y.abs() <= bound + 1e-3);
            prop_assert!(estimate.z.abs() <= bound + 1e-3);
        }
    }

    /// Rest never increases speed, motion changes velocity by exactly linear·dt
    #[test]
    fn integrator_branch_contract(
        seed_velocity in vector(5.0),
        linear in vector(3.0),
        dt_us in 0u64..500_000,
    ) {
        let mut integrator = VelocityIntegrator::new(0.1, 0.98);
        integrator.update(Vector3::new(1.0, 0.0, 0.0), Vector3::ZERO, 0);
        integrator.update(seed_velocity, Vector3::ZERO, 1_000_000);
        let before = integrator.velocity();
        let speed_before = integrator.speed();

        let now = 1_000_000 + dt_us;
        let step = integrator.step(linear, Vector3::ZERO, now);

        match step.branch {
            MotionBranch::Rest => {
                prop_assert!(linear.magnitude() < 0.1);
                prop_assert!(integrator.speed() <= speed_before + 1e-6);
            }
            MotionBranch::Moving => {
                let expected = before + linear * elapsed_secs(1_000_000, now);
                prop_assert!((step.velocity - expected).magnitude() < 1e-4);
            }
            MotionBranch::Priming => prop_assert!(false, "clock was already primed"),
        }
        prop_assert_eq!(integrator.last_update(), Some(now));
    }

    /// Time never runs backwards in an integral
    #[test]
    fn backwards_time_integrates_nothing(
        earlier in 0u64..1_000_000,
        back in 1u64..1_000_000,
    ) {
        let mut integrator = VelocityIntegrator::new(0.1, 0.98);
        let push = Vector3::new(2.0, 0.0, 0.0);
        integrator.update(push, Vector3::ZERO, earlier + back);
        let velocity = integrator.update(push, Vector3::ZERO, earlier);

        prop_assert_eq!(velocity, Vector3::ZERO);
        prop_assert_eq!(elapsed_secs(earlier + back, earlier), 0.0);
    }
}
