/// Asserts that two floats differ by less than an absolute precision.
#[macro_export]
macro_rules! assert_almost_eq {
    ($a:expr, $b:expr, $prec:expr $(,)?) => {
        if !$crate::numeric::almost_eq($a, $b, $prec) {
            panic!(
                "assertion failed: `abs(left - right) < {:e}`, (left: `{}`, right: `{}`)",
                $prec, $a, $b
            );
        }
    };
}

/// Asserts that `S + I + R` stays within `$tol` of the trajectory's population at every sample.
#[macro_export]
macro_rules! assert_conserved {
    ($trajectory:expr, $tol:expr $(,)?) => {{
        let trajectory = &$trajectory;
        let population = trajectory.population();
        for k in 0..trajectory.len() {
            let state = trajectory.state_at(k);
            if !$crate::numeric::almost_eq(state.total(), population, $tol) {
                panic!(
                    "population not conserved at t = {}: S + I + R = {}, N = {} (tolerance {:e})",
                    trajectory.time()[k],
                    state.total(),
                    population,
                    $tol
                );
            }
        }
    }};
}
