use rand::Rng;
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;

const OPERATORS: [&str; 4] = ["+", "-", "<<", ">>"];

/// Generates a valid expression with `len` operands
///
/// `depth` is the probability of opening a parenthesized group before an operand. The output
/// is the same for the same arguments.
pub fn demo_expression(len: usize, depth: f64) -> String {
    let mut rng = XorShiftRng::from_seed([0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15]);
    let mut res = String::new();
    let mut open = 0;

    for i in 0..len.max(1) {
        if i > 0 {
            let operator = OPERATORS[rng.gen_range(0..OPERATORS.len())];
            res.push(' ');
            res.push_str(operator);
            res.push(' ');
        }
        if rng.gen_range(0.0..1.0) < depth {
            res.push('(');
            open += 1;
        }
        res.push_str(&format!("v{}", rng.gen_range(0..16)));
        if open > 0 && rng.gen_range(0.0..1.0) < 0.5 {
            res.push(')');
            open -= 1;
        }
    }
    for _ in 0..open {
        res.push(')');
    }
    res
}
