//! Message broker clients, one config and one client per selected backend.

use super::{typed_dev, FeatureOutput};
use crate::domain::{
    entities::{ManifestPatch, OptionRecord},
    error::DomainError,
    rendering::RenderContext,
    value_objects::{ArtifactKind, FeatureKind, MessagingBackend},
};

pub(super) fn generate(options: &OptionRecord) -> Result<FeatureOutput, DomainError> {
    if options.messaging().is_empty() {
        return Err(DomainError::FeatureNotConfigured {
            feature: FeatureKind::Messaging.to_string(),
            reason: "no messaging backend selected".into(),
        });
    }

    let dialect = options.dialect();
    let mut output = FeatureOutput::new();
    let mut patch = ManifestPatch::new();

    for backend in options.messaging() {
        let ctx = RenderContext::new(dialect).with_variable("BACKEND", backend.as_str());
        let (config, client) = templates(*backend);

        output.emit(
            "src/config/{{BACKEND}}.{{EXT}}",
            config,
            &ctx,
            ArtifactKind::Config,
        )?;
        output.emit(
            "src/messaging/{{BACKEND}}.client.{{EXT}}",
            client,
            &ctx,
            ArtifactKind::Source,
        )?;

        patch = match backend {
            MessagingBackend::Kafka => patch.dependency("kafkajs", "^2.2.4"),
            MessagingBackend::RabbitMq => typed_dev(
                patch.dependency("amqplib", "^0.10.5"),
                dialect,
                &[("@types/amqplib", "^0.10.6")],
            ),
            MessagingBackend::Nats => patch.dependency("nats", "^2.28.2"),
        };
    }

    output.patch = patch;
    Ok(output)
}

fn templates(backend: MessagingBackend) -> (&'static str, &'static str) {
    match backend {
        MessagingBackend::Kafka => (KAFKA_CONFIG, KAFKA_CLIENT),
        MessagingBackend::RabbitMq => (RABBITMQ_CONFIG, RABBITMQ_CLIENT),
        MessagingBackend::Nats => (NATS_CONFIG, NATS_CLIENT),
    }
}

const KAFKA_CONFIG: &str = r#"{{#typed}}
import { KafkaConfig } from 'kafkajs';

{{/typed}}
{{#typed}}export {{/typed}}const kafkaConfig{{#typed}}: KafkaConfig{{/typed}} = {
  clientId: process.env.KAFKA_CLIENT_ID ?? 'app',
  brokers: (process.env.KAFKA_BROKERS ?? 'localhost:9092').split(','),
};
{{#untyped}}

module.exports = { kafkaConfig };
{{/untyped}}
"#;

const KAFKA_CLIENT: &str = r#"{{#typed}}
import { Kafka, EachMessagePayload } from 'kafkajs';
import { kafkaConfig } from '../config/kafka';
{{/typed}}
{{#untyped}}
const { Kafka } = require('kafkajs');
const { kafkaConfig } = require('../config/kafka');
{{/untyped}}

const kafka = new Kafka(kafkaConfig);
const producer = kafka.producer();
let connected = false;

{{#typed}}export {{/typed}}async function publish(topic{{#typed}}: string{{/typed}}, message{{#typed}}: unknown{{/typed}}){{#typed}}: Promise<void>{{/typed}} {
  if (!connected) {
    await producer.connect();
    connected = true;
  }
  await producer.send({ topic, messages: [{ value: JSON.stringify(message) }] });
}

{{#typed}}export {{/typed}}async function subscribe(
  groupId{{#typed}}: string{{/typed}},
  topic{{#typed}}: string{{/typed}},
  handler{{#typed}}: (payload: EachMessagePayload) => Promise<void>{{/typed}},
){{#typed}}: Promise<void>{{/typed}} {
  const consumer = kafka.consumer({ groupId });
  await consumer.connect();
  await consumer.subscribe({ topic, fromBeginning: false });
  await consumer.run({ eachMessage: handler });
}
{{#untyped}}

module.exports = { publish, subscribe };
{{/untyped}}
"#;

const RABBITMQ_CONFIG: &str = r#"{{#typed}}export {{/typed}}const rabbitmqConfig = {
  url: process.env.RABBITMQ_URL ?? 'amqp://localhost:5672',
};
{{#untyped}}

module.exports = { rabbitmqConfig };
{{/untyped}}
"#;

const RABBITMQ_CLIENT: &str = r#"{{#typed}}
import amqp, { Channel, ConsumeMessage } from 'amqplib';
import { rabbitmqConfig } from '../config/rabbitmq';
{{/typed}}
{{#untyped}}
const amqp = require('amqplib');
const { rabbitmqConfig } = require('../config/rabbitmq');
{{/untyped}}

let channel{{#typed}}: Channel | undefined{{/typed}};

async function getChannel(){{#typed}}: Promise<Channel>{{/typed}} {
  if (!channel) {
    const connection = await amqp.connect(rabbitmqConfig.url);
    channel = await connection.createChannel();
  }
  return channel;
}

{{#typed}}export {{/typed}}async function publish(queue{{#typed}}: string{{/typed}}, message{{#typed}}: unknown{{/typed}}){{#typed}}: Promise<void>{{/typed}} {
  const ch = await getChannel();
  await ch.assertQueue(queue, { durable: true });
  ch.sendToQueue(queue, Buffer.from(JSON.stringify(message)), { persistent: true });
}

{{#typed}}export {{/typed}}async function consume(
  queue{{#typed}}: string{{/typed}},
  handler{{#typed}}: (message: ConsumeMessage) => Promise<void>{{/typed}},
){{#typed}}: Promise<void>{{/typed}} {
  const ch = await getChannel();
  await ch.assertQueue(queue, { durable: true });
  await ch.consume(queue, async (message) => {
    if (!message) {
      return;
    }
    await handler(message);
    ch.ack(message);
  });
}
{{#untyped}}

module.exports = { publish, consume };
{{/untyped}}
"#;

const NATS_CONFIG: &str = r#"{{#typed}}export {{/typed}}const natsConfig = {
  servers: (process.env.NATS_URL ?? 'nats://localhost:4222').split(','),
};
{{#untyped}}

module.exports = { natsConfig };
{{/untyped}}
"#;

const NATS_CLIENT: &str = r#"{{#typed}}
import { connect, JSONCodec, NatsConnection } from 'nats';
import { natsConfig } from '../config/nats';
{{/typed}}
{{#untyped}}
const { connect, JSONCodec } = require('nats');
const { natsConfig } = require('../config/nats');
{{/untyped}}

const codec = JSONCodec();
let connection{{#typed}}: NatsConnection | undefined{{/typed}};

async function getConnection(){{#typed}}: Promise<NatsConnection>{{/typed}} {
  if (!connection) {
    connection = await connect(natsConfig);
  }
  return connection;
}

{{#typed}}export {{/typed}}async function publish(subject{{#typed}}: string{{/typed}}, message{{#typed}}: unknown{{/typed}}){{#typed}}: Promise<void>{{/typed}} {
  const nc = await getConnection();
  nc.publish(subject, codec.encode(message));
}

{{#typed}}export {{/typed}}async function subscribe(
  subject{{#typed}}: string{{/typed}},
  handler{{#typed}}: (message: unknown) => Promise<void>{{/typed}},
){{#typed}}: Promise<void>{{/typed}} {
  const nc = await getConnection();
  const sub = nc.subscribe(subject);
  for await (const msg of sub) {
    await handler(codec.decode(msg.data));
  }
}
{{#untyped}}

module.exports = { publish, subscribe };
{{/untyped}}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::Dialect;

    #[test]
    fn one_config_and_client_per_backend() {
        let options = OptionRecord::builder()
            .messaging([MessagingBackend::Nats, MessagingBackend::Kafka])
            .build()
            .unwrap();
        let output = generate(&options).unwrap();
        assert_eq!(
            output.artifacts.paths(),
            vec![
                "src/config/kafka.ts",
                "src/messaging/kafka.client.ts",
                "src/config/nats.ts",
                "src/messaging/nats.client.ts"
            ]
        );
        assert!(output.patch.dependencies.contains_key("kafkajs"));
        assert!(output.patch.dependencies.contains_key("nats"));
        assert!(!output.patch.dependencies.contains_key("amqplib"));
    }

    #[test]
    fn rabbitmq_typings_only_for_typed() {
        let options = OptionRecord::builder()
            .dialect(Dialect::Untyped)
            .messaging([MessagingBackend::RabbitMq])
            .build()
            .unwrap();
        let output = generate(&options).unwrap();
        assert!(output.patch.dev_dependencies.is_empty());
        let client = output.artifacts.iter().nth(1).unwrap().content();
        assert!(client.starts_with("const amqp = require('amqplib');"));
        assert!(client.contains("let channel;"));
    }

    #[test]
    fn empty_selection_is_not_configured() {
        let err = generate(&OptionRecord::default()).unwrap_err();
        assert!(matches!(err, DomainError::FeatureNotConfigured { .. }));
    }
}
