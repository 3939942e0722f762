use online_mlp::{Activation, NetworkBuilder};

fn main() -> online_mlp::Result<()> {
    // XOR with targets scaled into the open range of tanh(s/2).
    let xs = [[0.0, 0.0], [0.0, 1.0], [1.0, 0.0], [1.0, 1.0]];
    let ys = [[-0.8], [0.8], [0.8], [-0.8]];

    // 2 -> 4 -> 1 network, bias feature on.
    let mut net = NetworkBuilder::new(2)?
        .layers(&[4, 1])?
        .activation(Activation::Tanh)
        .train_rate(0.2)
        .build_with_seed(7)?;

    for epoch in 0..5_000 {
        let mut sq_err = 0.0;
        for (x, y) in xs.iter().zip(&ys) {
            net.set_inputs(x);
            net.set_targets(y);
            net.evaluate();
            net.train();
            let diff = y[0] - net.outputs()[0];
            sq_err += diff * diff;
        }
        if epoch % 1_000 == 0 {
            println!("epoch={epoch} mse={}", sq_err / xs.len() as f64);
        }
    }

    for (x, y) in xs.iter().zip(&ys) {
        net.set_inputs(x);
        net.evaluate();
        println!("x={x:?} target={} y={}", y[0], net.outputs()[0]);
    }

    Ok(())
}
