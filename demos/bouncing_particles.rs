// demos/bouncing_particles.rs

use rs_collisions::particles::CollisionSystem;
use rs_collisions::utils::SimulationConstants;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut system = CollisionSystem::new(SimulationConstants::default())?;

    // Seed a block of particles near the top of the arena, the way a
    // mouse-driven emitter would stream them in.
    for i in 0..120 {
        let x = 300.0 + 10.0 * (i % 20) as f64;
        let y = 50.0 + 15.0 * (i / 20) as f64;
        system.spawn_particle((x, y), 0.5);
    }

    println!("Simulating {} particles for 10 seconds of arena time...", system.particle_count());

    let dt = 1.0 / 60.0;
    for frame in 0..600 {
        system.step(dt)?;

        if frame % 120 == 0 {
            let average_speed: f64 = system.particles().iter().map(|p| p.speed()).sum::<f64>()
                / system.particle_count() as f64;
            let mut rects = Vec::new();
            if let Some(tree) = system.quadtree() {
                tree.boundaries(&mut rects);
            }
            println!(
                "frame {:>3}: average speed {:.4} per substep, quadtree nodes {}",
                frame,
                average_speed,
                rects.len()
            );
        }
    }

    let lowest = system.particles().iter().map(|p| p.position.1).fold(f64::MIN, f64::max);
    println!("Done. Lowest particle rests at y = {:.1}", lowest);

    Ok(())
}
