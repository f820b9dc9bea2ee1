use qnoise::{
    c,
    channel::{ Kraus, SuperOp, Tolerance },
    circuit::Gate,
    noise::{ ChannelOptions, StochasticChannel },
};

// build a bit-flip channel three different ways and check that they all
// describe the same physical process
//
//   ρ ↦ (1 - p) ρ + p XρX
//
fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    const P: f64 = 0.1;

    // as a mixture of circuits
    let mixture = StochasticChannel::new([(Gate::X, P), (Gate::I, 1.0 - P)])?;
    println!("{mixture}");

    // as a single Kraus instruction
    let z = c!(0.0);
    let a = c!((1.0 - P).sqrt());
    let b = c!(P.sqrt());
    let kraus =
        Kraus::new([
            ndarray::array![[a, z], [z, a]],
            ndarray::array![[z, b], [b, z]],
        ])?;
    let single = StochasticChannel::from_op(kraus)?;
    println!("{single}");

    // from a dense super-operator, read with tolerances from a config string
    let opts: ChannelOptions =
        serde_json::from_str(r#"{ "tolerance": { "atol": 1e-10 } }"#)?;
    let superop = mixture.to_superop()?;
    let dense: SuperOp = superop.clone();
    let rebuilt = StochasticChannel::with_options([(dense, 1.0)], &opts)?;
    println!("{rebuilt}");

    println!("mixture == kraus: {}", mixture == single);
    println!("mixture == dense: {}", mixture == rebuilt);
    println!("is CPTP: {}", superop.is_cptp(&Tolerance::default()));

    // a probability sum outside tolerance is rejected
    match StochasticChannel::new([(Gate::X, 0.6), (Gate::I, 0.6)]) {
        Ok(_) => println!("unexpectedly accepted"),
        Err(err) => println!("rejected: {err}"),
    }

    println!("{}", mixture.to_json()?);
    Ok(())
}
