use crate::types::{Outage, StateSample, Timestamp};

/// Reconstrói outages a partir das mudanças de estado, dentro de uma janela
/// `[from, to)` opcional em cada extremo.
#[derive(Debug, Clone, Copy, Default)]
pub struct OutageExtractor {
    from: Option<Timestamp>,
    to: Option<Timestamp>,
}

impl OutageExtractor {
    pub fn new(from: Option<Timestamp>, to: Option<Timestamp>) -> Self {
        Self { from, to }
    }

    /// Converte as amostras em outages consolidados.
    ///
    /// `previous` é a amostra imediatamente anterior a `from`; só é usada
    /// quando `from` foi informado e nunca gera intervalo antes de `from`.
    pub fn extract(&self, samples: &[StateSample], previous: Option<&StateSample>) -> Vec<Outage> {
        if samples.is_empty() {
            return Vec::new();
        }

        let mut ordered: Vec<&StateSample> = samples.iter().collect();
        if !ordered.is_sorted_by_key(|sample| sample.timestamp) {
            ordered.sort_by_key(|sample| sample.timestamp);
        }

        let seed = match (self.from, previous) {
            (Some(_), Some(prev)) if prev.timestamp < ordered[0].timestamp => Some(prev),
            _ => None,
        };

        let transitions = consolidate(seed.into_iter().chain(ordered));

        let mut outages: Vec<Outage> = Vec::with_capacity(transitions.len());
        for (index, sample) in transitions.iter().enumerate() {
            let start = match self.from {
                Some(from) => sample.timestamp.max(from),
                None => sample.timestamp,
            };
            let next = transitions.get(index + 1).map(|next| next.timestamp);
            let end = match (next, self.to) {
                (Some(next), Some(to)) => Some(next.min(to)),
                (Some(next), None) => Some(next),
                (None, to) => to,
            };

            if let Some(to) = self.to {
                if start >= to {
                    break;
                }
            }
            if end.is_some_and(|end| start >= end) {
                continue;
            }

            // Um outage vazio descartado pode deixar dois estados iguais lado a lado.
            match outages.last_mut() {
                Some(last) if last.state == sample.state => last.end = end,
                _ => outages.push(Outage::new(sample.state.clone(), start, end)),
            }
        }
        outages
    }
}

/// Mantém só a primeira amostra de cada sequência de estados repetidos.
fn consolidate<'a>(samples: impl IntoIterator<Item = &'a StateSample>) -> Vec<&'a StateSample> {
    let mut transitions: Vec<&StateSample> = Vec::new();
    for sample in samples {
        match transitions.last() {
            Some(last) if last.state == sample.state => {}
            _ => transitions.push(sample),
        }
    }
    transitions
}

/// Filtra os outages de estados não saudáveis.
pub fn problems(outages: &[Outage], healthy_state: &str) -> Vec<Outage> {
    outages
        .iter()
        .filter(|outage| outage.state != healthy_state)
        .cloned()
        .collect()
}
