use qnoise::{
    channel::{ Operator, Tolerance },
    circuit::Gate,
    noise::{ ChannelOptions, StochasticChannel, standard },
    phase::Phase,
};

// compose single-qubit noise into a two-qubit context and compare against the
// dense calculation
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let flip = standard::pauli_error(&[("X", 0.05), ("I", 0.95)])?;
    let dephase = standard::pauli_error(&[("Z", 0.2), ("I", 0.8)])?;

    // sequential: bit flip followed by dephasing
    let seq = flip.compose(&dephase, None, false)?;
    println!("sequential: {} terms", seq.size());
    println!("{seq}");

    // parallel: dephasing on qubit 1, bit flip on qubit 0
    let par = dephase.tensor(&flip)?;
    println!("parallel: {} qubits, {} terms", par.num_qubits(), par.size());

    // a CX gate with two-qubit depolarizing noise, followed by bit flip noise
    // on the target only
    let cx = StochasticChannel::from_op((Gate::CX, [0, 1]))?;
    let depol = standard::depolarizing_error(0.01, 2)?;
    let noisy_cx =
        cx.compose(&depol, None, false)?
        .compose(&flip, Some(&[1]), false)?;
    println!("noisy CX: {} terms", noisy_cx.size());

    let dense =
        cx.compose_dense(&depol.to_superop()?, None, false)?;
    let dense =
        dense.compose(&flip.to_superop()?, Some(&[1]), false)?;
    println!(
        "matches dense composition: {}",
        noisy_cx.to_superop()?.approx_eq(&dense, &noisy_cx.tolerance()),
    );

    // a small coherent over-rotation about x, checked with a loose tolerance
    let over = Operator::new(Gate::XRot(Phase::new(1, 256)).matrix())?;
    let opts = ChannelOptions::new(Tolerance::new(1e-6, 0.0));
    let coherent = standard::coherent_unitary_error_with_options(over, &opts)?;
    let drifted = noisy_cx.compose(&coherent, Some(&[0]), false)?;
    println!("with over-rotation: {} terms", drifted.size());

    // arithmetic is not defined on mixtures
    if let Err(err) = &flip + &dephase {
        println!("{err}");
    }
    Ok(())
}
