//! Draws a small spring network to PNG and SVG.
//!
//! Run: cargo run --example spring_demo

use spring_viz::prelude::*;

fn main() -> Result<()> {
    let mut nodes = DataFrame::new();
    nodes.add_column_f32("x", &[0.0, 4.0, 2.0, 6.0]);
    nodes.add_column_f32("y", &[0.0, 0.0, 3.0, 3.0]);

    let mut edges = DataFrame::new();
    edges.add_column_f32("x", &[0.0, 0.0, 4.0, 2.0, 4.0]);
    edges.add_column_f32("y", &[0.0, 0.0, 0.0, 3.0, 0.0]);
    edges.add_column_f32("xend", &[4.0, 2.0, 2.0, 6.0, 6.0]);
    edges.add_column_f32("yend", &[0.0, 3.0, 3.0, 3.0, 3.0]);
    edges.add_column_str("kind", &["rigid", "soft", "soft", "rigid", "soft"]);
    edges.add_column_f32("stiffness", &[5.0, 1.0, 2.0, 4.0, 1.5]);

    let mut config = PlotConfig::load_or_default("spring_demo.yaml");
    if config.spring == SpringParams::default() {
        config.spring.diameter = 0.4;
    }

    let plot = config
        .apply(GGPlot::new())?
        .data(edges)
        .aes(Aes::new().x("x").y("y").xend("xend").yend("yend").color("kind").tension("stiffness"))
        .layer(config.spring_layer())
        .layer(
            Layer::new(Geom::point())
                .data(nodes)
                .aes(Aes::new().x("x").y("y").size_value(10.0))
                .inherit_aes(false),
        )
        .coord(Coord::equal())
        .xlab("x")
        .ylab("y")
        .title("Spring network")
        .build()?;

    plot.render_to_file("spring_demo.png")?;
    plot.render_svg_to_file("spring_demo.svg")?;
    println!("Wrote spring_demo.png and spring_demo.svg");
    Ok(())
}
