//! socket.io server and event handlers.

use super::FeatureOutput;
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::ArtifactKind,
};

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    let ctx = RenderContext::new(options.dialect());
    let mut output = FeatureOutput::new();

    output.emit("src/config/socket.{{EXT}}", SOCKET_CONFIG, &ctx, ArtifactKind::Config)?;
    output.emit("src/realtime/events.{{EXT}}", EVENTS, &ctx, ArtifactKind::Source)?;
    output.patch = ManifestPatch::new().dependency("socket.io", "^4.8.1");

    Ok(output)
}

const SOCKET_CONFIG: &str = r#"{{#typed}}
import { Server as HttpServer } from 'http';
import { Server } from 'socket.io';
import { registerEvents } from '../realtime/events';
{{/typed}}
{{#untyped}}
const { Server } = require('socket.io');
const { registerEvents } = require('../realtime/events');
{{/untyped}}

// kiln:wire pass the server returned by app.listen() to createSocketServer
{{#typed}}export {{/typed}}function createSocketServer(httpServer{{#typed}}: HttpServer{{/typed}}){{#typed}}: Server{{/typed}} {
  const io = new Server(httpServer, {
    cors: { origin: process.env.SOCKET_CORS_ORIGIN ?? '*' },
  });
  registerEvents(io);
  return io;
}
{{#untyped}}

module.exports = { createSocketServer };
{{/untyped}}
"#;

const EVENTS: &str = r#"{{#typed}}
import { Server, Socket } from 'socket.io';

{{/typed}}
{{#typed}}export {{/typed}}function registerEvents(io{{#typed}}: Server{{/typed}}){{#typed}}: void{{/typed}} {
  io.on('connection', (socket{{#typed}}: Socket{{/typed}}) => {
    socket.on('join', (room{{#typed}}: string{{/typed}}) => {
      socket.join(room);
    });

    socket.on('message', (payload{{#typed}}: { room?: string; body: unknown }{{/typed}}) => {
      if (payload.room) {
        io.to(payload.room).emit('message', payload.body);
      } else {
        io.emit('message', payload.body);
      }
    });
  });
}
{{#untyped}}

module.exports = { registerEvents };
{{/untyped}}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_server_and_events() {
        let options = OptionRecord::builder().realtime(true).build().unwrap();
        let output = generate(&options).unwrap();
        assert_eq!(
            output.artifacts.paths(),
            vec!["src/config/socket.ts", "src/realtime/events.ts"]
        );
        assert_eq!(output.patch.dependencies["socket.io"], "^4.8.1");
    }
}
