//! Pendulum - the tethered-motion sub-model.
//!
//! While tethered the player moves on an arc around a fixed anchor inside a
//! vertical swing plane. Physics owns only `(anchor, length, plane, angle,
//! angular velocity)`; rope segments, meshes and "pump" visuals belong to the
//! rendering collaborator.
//!
//! Attach decomposes the player's linear velocity into the tangential
//! component `v_tan = v·cos(angle) + v_y·sin(angle)` and discards the radial
//! component. That energy loss is intentional: snapping taut feels better
//! than an elastic jerk.

#[derive(Clone, Copy, Debug)]
pub struct Pendulum {
    pub anchor_id: u32,
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub anchor_z: f32,
    pub length: f32,
    /// Unit vector of the swing plane on the ground plane.
    pub plane_x: f32,
    pub plane_z: f32,
    /// Swing angle from straight-down, positive toward the plane vector.
    pub angle: f32,
    pub angular_vel: f32,
}

fn normalize_or(x: f32, z: f32, fallback: (f32, f32)) -> (f32, f32) {
    let len = (x * x + z * z).sqrt();
    if len > 1e-4 {
        (x / len, z / len)
    } else {
        fallback
    }
}

impl Pendulum {
    /// Build the attachment from the player's current state. `max_length` is
    /// the anchor's configured tether length; the rope starts taut at the
    /// current separation, clamped into `[min_length, max_length]`.
    #[allow(clippy::too_many_arguments)]
    pub fn attach(
        anchor_id: u32,
        anchor: (f32, f32, f32),
        player: (f32, f32, f32),
        velocity: (f32, f32, f32),
        facing: (f32, f32),
        max_length: f32,
        min_length: f32,
    ) -> Self {
        let dx = player.0 - anchor.0;
        let dy = player.1 - anchor.1;
        let dz = player.2 - anchor.2;
        let dist = (dx * dx + dy * dy + dz * dz).sqrt();
        let length = dist.clamp(min_length, max_length.max(min_length));

        // Swing plane: direction of travel, else the horizontal offset from
        // the anchor, else where the player is looking.
        let (plane_x, plane_z) = normalize_or(
            velocity.0,
            velocity.2,
            normalize_or(dx, dz, normalize_or(facing.0, facing.1, (1.0, 0.0))),
        );

        let along = dx * plane_x + dz * plane_z;
        let angle = along.atan2(-dy);

        let v_along = velocity.0 * plane_x + velocity.2 * plane_z;
        let v_tan = v_along * angle.cos() + velocity.1 * angle.sin();
        let angular_vel = v_tan / length;

        Pendulum {
            anchor_id,
            anchor_x: anchor.0,
            anchor_y: anchor.1,
            anchor_z: anchor.2,
            length,
            plane_x,
            plane_z,
            angle,
            angular_vel,
        }
    }

    /// One integration tick: `alpha = -(g/L)·sin(angle)` with multiplicative
    /// damping on the angular velocity. Semi-implicit, so the undamped part
    /// stays bounded on long swings.
    pub fn step(&mut self, dt: f32, gravity: f32, damping: f32) {
        let alpha = -(gravity / self.length) * self.angle.sin();
        self.angular_vel += alpha * dt;
        self.angular_vel *= damping;
        self.angle += self.angular_vel * dt;
    }

    /// Player position on the arc for the current angle.
    pub fn position(&self) -> (f32, f32, f32) {
        let s = self.angle.sin() * self.length;
        (
            self.anchor_x + self.plane_x * s,
            self.anchor_y - self.angle.cos() * self.length,
            self.anchor_z + self.plane_z * s,
        )
    }

    /// Instantaneous linear velocity on the arc: `v_h = w·L·cos(angle)`
    /// along the swing plane, `v_y = w·L·sin(angle)`.
    pub fn linear_velocity(&self) -> (f32, f32, f32) {
        let v_h = self.angular_vel * self.length * self.angle.cos();
        let v_y = self.angular_vel * self.length * self.angle.sin();
        (self.plane_x * v_h, v_y, self.plane_z * v_h)
    }
}
